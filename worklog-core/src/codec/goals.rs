use std::sync::LazyLock;

use regex::Regex;

use super::{SEPARATOR, SlotCodec, fit_slots, normalize_newlines};
use crate::domain::GoalEntry;

pub const DONE_MARKER: &str = "[DONE]";
pub const IN_PROGRESS_MARKER: &str = "[IN-PROGRESS]";

// Markers written by the localized first version of the tool.
const LEGACY_DONE_MARKER: &str = "[완료]";
const LEGACY_IN_PROGRESS_MARKER: &str = "[진행중]";

static LEGACY_NUMBERING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\s+").unwrap());

/// `[DONE] text` / `[IN-PROGRESS] text` fragments joined by a blank line.
pub struct GoalCodec;

impl SlotCodec for GoalCodec {
    type Entry = GoalEntry;

    const DEFAULT_SLOTS: usize = 5;

    fn encode(&self, entries: &[GoalEntry]) -> String {
        entries
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| {
                let marker = if e.completed {
                    DONE_MARKER
                } else {
                    IN_PROGRESS_MARKER
                };
                format!("{marker} {}", e.text.trim())
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn decode(&self, text: &str, max_slots: usize) -> Vec<GoalEntry> {
        let text = normalize_newlines(text);
        let items: Vec<GoalEntry> = text
            .split(SEPARATOR)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(decode_fragment)
            .collect();
        fit_slots(items, max_slots, "goals")
    }
}

fn decode_fragment(fragment: &str) -> GoalEntry {
    let marked = [
        (DONE_MARKER, true),
        (IN_PROGRESS_MARKER, false),
        (LEGACY_DONE_MARKER, true),
        (LEGACY_IN_PROGRESS_MARKER, false),
    ];
    for (marker, completed) in marked {
        if let Some(rest) = fragment.strip_prefix(marker) {
            return GoalEntry::new(rest.trim(), completed);
        }
    }
    // Unmarked fragments predate completion flags: "1. Finish report".
    let text = LEGACY_NUMBERING.replace(fragment, "");
    GoalEntry::new(text.trim(), false)
}
