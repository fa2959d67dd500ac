// worklog_core/src/domain.rs
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::codec::{GoalCodec, IssueCodec, SlotCodec};
use crate::error::{Result, WorklogError};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// One goal slot: free text plus its completion checkbox.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GoalEntry {
    pub text: String,
    pub completed: bool,
}

impl GoalEntry {
    pub fn new(text: impl Into<String>, completed: bool) -> Self {
        Self {
            text: text.into(),
            completed,
        }
    }

    /// Blank slots are never persisted and never count toward the rate.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Daily,
    Weekly,
    Monthly,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Daily => "daily",
            Category::Weekly => "weekly",
            Category::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = WorklogError;

    fn from_str(s: &str) -> Result<Self> {
        // Localized labels are what older stores contain.
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "일일 업무" => Ok(Category::Daily),
            "weekly" | "주간 계획" => Ok(Category::Weekly),
            "monthly" | "월간 계획" => Ok(Category::Monthly),
            other => Err(WorklogError::Parse(format!(
                "unknown category \"{other}\" (expected daily, weekly or monthly)"
            ))),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    InProgress,
    Done,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Status {
    type Err = WorklogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-progress" | "in progress" | "진행 중" => Ok(Status::InProgress),
            "done" | "완료" => Ok(Status::Done),
            other => Err(WorklogError::Parse(format!(
                "unknown status \"{other}\" (expected in-progress or done)"
            ))),
        }
    }
}

/// A stored report row. Identity is the row position in the store.
///
/// `goals` and `issues` hold the encoded wire text; use [`Report::goal_entries`]
/// and [`Report::issue_entries`] for the slot view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Report {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub author: String,
    pub category: Category,
    pub goals: String,
    pub status: Status,
    pub completion_rate: u8,
    pub issues: String,
}

impl Report {
    pub fn goal_entries(&self, slots: usize) -> Vec<GoalEntry> {
        GoalCodec.decode(&self.goals, slots)
    }

    pub fn issue_entries(&self, slots: usize) -> Vec<String> {
        IssueCodec.decode(&self.issues, slots)
    }
}

/// Caller-supplied fields for a submit or an update.
#[derive(Clone, Debug)]
pub struct ReportInput {
    pub author: String,
    pub category: Category,
    pub date: Date,
    pub status: Status,
    pub goals: Vec<GoalEntry>,
    pub issues: Vec<String>,
}

/// Decoded view of a stored report, padded to the configured slot counts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportDraft {
    pub index: usize,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub author: String,
    pub category: Category,
    pub status: Status,
    pub completion_rate: u8,
    pub goals: Vec<GoalEntry>,
    pub issues: Vec<String>,
}

impl ReportDraft {
    pub fn into_input(self) -> ReportInput {
        ReportInput {
            author: self.author,
            category: self.category,
            date: self.date,
            status: self.status,
            goals: self.goals,
            issues: self.issues,
        }
    }
}

pub fn parse_date(s: &str) -> Result<Date> {
    // Tolerate a trailing time component ("2024-05-02 00:00:00").
    let head = s.trim().split([' ', 'T']).next().unwrap_or_default();
    Date::parse(head, DATE_FORMAT)
        .map_err(|e| WorklogError::Parse(format!("invalid date \"{}\": {e}", s.trim())))
}

pub fn format_date(d: Date) -> String {
    format!("{:04}-{:02}-{:02}", d.year(), u8::from(d.month()), d.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn category_accepts_wire_and_legacy_labels() {
        assert_eq!("daily".parse::<Category>().unwrap(), Category::Daily);
        assert_eq!("Weekly".parse::<Category>().unwrap(), Category::Weekly);
        assert_eq!("월간 계획".parse::<Category>().unwrap(), Category::Monthly);
        assert!("yearly".parse::<Category>().is_err());
    }

    #[test]
    fn status_accepts_wire_and_legacy_labels() {
        assert_eq!("done".parse::<Status>().unwrap(), Status::Done);
        assert_eq!("진행 중".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(Status::InProgress.to_string(), "in-progress");
    }

    #[test]
    fn dates_render_and_parse() {
        let d = date!(2024 - 03 - 07);
        assert_eq!(format_date(d), "2024-03-07");
        assert_eq!(parse_date("2024-03-07").unwrap(), d);
        assert_eq!(parse_date("2024-03-07 00:00:00").unwrap(), d);
        assert!(parse_date("07/03/2024").is_err());
    }

    #[test]
    fn blank_goal_is_whitespace_only() {
        assert!(GoalEntry::new("  \n", true).is_blank());
        assert!(!GoalEntry::new(" x ", false).is_blank());
    }
}
