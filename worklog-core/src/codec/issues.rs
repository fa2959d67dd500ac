use std::sync::LazyLock;

use regex::Regex;

use super::{SEPARATOR, SlotCodec, fit_slots, normalize_newlines};

/// A `N. ` prefix at the start of the text or of a line. The number is
/// discarded on decode; entries come back in textual order.
pub(crate) static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\n)\d+\.\s+").unwrap());

/// `1. text` fragments joined by a blank line, renumbered on every encode.
pub struct IssueCodec;

impl SlotCodec for IssueCodec {
    type Entry = String;

    const DEFAULT_SLOTS: usize = 3;

    fn encode(&self, entries: &[String]) -> String {
        entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .enumerate()
            .map(|(i, e)| format!("{}. {e}", i + 1))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn decode(&self, text: &str, max_slots: usize) -> Vec<String> {
        let text = normalize_newlines(text);
        let items: Vec<String> = NUMBERED_LINE
            .split(&text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        fit_slots(items, max_slots, "issues")
    }
}
