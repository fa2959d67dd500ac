/// Fragment separator shared by both slot encodings.
pub const SEPARATOR: &str = "\n\n";

/// A fixed-slot text field codec.
///
/// `encode` drops blank slots; `decode` always returns exactly `max_slots`
/// entries, padding with `Entry::default()` and dropping any surplus tail.
/// Both are total: decode of arbitrary text degrades to best-effort extraction.
pub trait SlotCodec {
    type Entry: Default;

    const DEFAULT_SLOTS: usize;

    fn encode(&self, entries: &[Self::Entry]) -> String;

    fn decode(&self, text: &str, max_slots: usize) -> Vec<Self::Entry>;
}

/// Pad or truncate decoded fragments to exactly `max_slots`.
fn fit_slots<T: Default>(mut items: Vec<T>, max_slots: usize, field: &str) -> Vec<T> {
    if items.len() > max_slots {
        tracing::warn!(
            field,
            found = items.len(),
            max_slots,
            "dropping fragments beyond slot limit"
        );
        items.truncate(max_slots);
    }
    items.resize_with(max_slots, T::default);
    items
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

pub mod goals;
pub mod issues;

pub use goals::GoalCodec;
pub use issues::IssueCodec;
