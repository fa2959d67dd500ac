use crate::domain::GoalEntry;

/// Percentage of non-blank goals flagged complete, truncated toward zero.
///
/// Blank slots are ignored entirely; a report with no non-blank goals rates 0.
pub fn completion_rate(entries: &[GoalEntry]) -> u8 {
    let valid = entries.iter().filter(|e| !e.is_blank()).count();
    if valid == 0 {
        return 0;
    }
    let checked = entries
        .iter()
        .filter(|e| !e.is_blank() && e.completed)
        .count();
    // checked <= valid, so the quotient never exceeds 100
    (checked * 100 / valid) as u8
}
