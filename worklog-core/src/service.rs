use crate::codec::issues::NUMBERED_LINE;
use crate::codec::{GoalCodec, IssueCodec, SEPARATOR, SlotCodec};
use crate::config::Config;
use crate::domain::{GoalEntry, Report, ReportDraft, ReportInput};
use crate::error::{Result, WorklogError};
use crate::rate::completion_rate;
use crate::repo::RecordStore;
use crate::stats::Summary;

/// Create and edit reports against a [`RecordStore`].
///
/// Every write recomputes the completion rate from the goals it encodes, so
/// the stored rate always matches the stored goals.
pub struct ReportService {
    store: Box<dyn RecordStore>,
    goal_slots: usize,
    issue_slots: usize,
}

impl ReportService {
    /// Wrap `store`, creating it if it does not exist yet.
    pub fn open(store: Box<dyn RecordStore>, config: &Config) -> Result<Self> {
        config.validate()?;
        store.initialize()?;
        Ok(Self {
            store,
            goal_slots: config.goal_slots,
            issue_slots: config.issue_slots,
        })
    }

    pub fn submit(&self, input: ReportInput) -> Result<Report> {
        self.validate(&input)?;
        let report = build_report(input);
        self.store.append(&report)?;
        tracing::info!(
            author = %report.author,
            category = %report.category,
            rate = report.completion_rate,
            "report submitted"
        );
        Ok(report)
    }

    /// Replace the report at row `index`. The whole store is rewritten.
    pub fn update(&self, index: usize, input: ReportInput) -> Result<Report> {
        self.validate(&input)?;
        let mut rows = self.store.load_all()?;
        let len = rows.len();
        let slot = rows
            .get_mut(index)
            .ok_or(WorklogError::RowOutOfRange { index, len })?;

        let prior_goals = filled(&slot.goal_entries(self.goal_slots));
        let prior_issues = slot
            .issue_entries(self.issue_slots)
            .iter()
            .filter(|i| !i.trim().is_empty())
            .count();

        let report = build_report(input);
        tracing::info!(
            index,
            prior_goals,
            goals = filled(&report.goal_entries(self.goal_slots)),
            prior_issues,
            prior_rate = slot.completion_rate,
            rate = report.completion_rate,
            "report updated"
        );
        *slot = report.clone();
        self.store.rewrite_all(&rows)?;
        Ok(report)
    }

    pub fn reports(&self) -> Result<Vec<Report>> {
        self.store.load_all()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.store.is_empty()
    }

    /// Slot view of row `index`, padded for an edit form.
    pub fn draft(&self, index: usize) -> Result<ReportDraft> {
        let rows = self.store.load_all()?;
        let len = rows.len();
        let r = rows
            .into_iter()
            .nth(index)
            .ok_or(WorklogError::RowOutOfRange { index, len })?;
        Ok(ReportDraft {
            index,
            goals: r.goal_entries(self.goal_slots),
            issues: r.issue_entries(self.issue_slots),
            date: r.date,
            author: r.author,
            category: r.category,
            status: r.status,
            completion_rate: r.completion_rate,
        })
    }

    pub fn summary(&self) -> Result<Summary> {
        Ok(Summary::from_reports(&self.store.load_all()?))
    }

    fn validate(&self, input: &ReportInput) -> Result<()> {
        if input.author.trim().is_empty() {
            return Err(WorklogError::validation("author is required"));
        }
        if input.goals.len() > self.goal_slots {
            return Err(WorklogError::validation(format!(
                "at most {} goals per report, got {}",
                self.goal_slots,
                input.goals.len()
            )));
        }
        if input.issues.len() > self.issue_slots {
            return Err(WorklogError::validation(format!(
                "at most {} issues per report, got {}",
                self.issue_slots,
                input.issues.len()
            )));
        }
        if filled(&input.goals) == 0 {
            return Err(WorklogError::validation("at least one goal is required"));
        }
        for (i, g) in input.goals.iter().enumerate() {
            if g.text.trim().replace("\r\n", "\n").contains(SEPARATOR) {
                return Err(WorklogError::validation(format!(
                    "goal {} must not contain a blank line",
                    i + 1
                )));
            }
        }
        for (i, issue) in input.issues.iter().enumerate() {
            let text = issue.trim().replace("\r\n", "\n");
            if NUMBERED_LINE
                .find_iter(&text)
                .any(|m| m.as_str().starts_with('\n'))
            {
                return Err(WorklogError::validation(format!(
                    "issue {}: only the first line may start with a number like \"2. \"",
                    i + 1
                )));
            }
        }
        Ok(())
    }
}

fn filled(goals: &[GoalEntry]) -> usize {
    goals.iter().filter(|g| !g.is_blank()).count()
}

fn build_report(input: ReportInput) -> Report {
    Report {
        completion_rate: completion_rate(&input.goals),
        goals: GoalCodec.encode(&input.goals),
        issues: IssueCodec.encode(&input.issues),
        date: input.date,
        author: input.author.trim().to_string(),
        category: input.category,
        status: input.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, Status};
    use crate::repo::StoreParams;
    use crate::repo_factory::{Backend, open_store};
    use time::macros::date;

    fn service() -> ReportService {
        let store = open_store(
            Backend::Memory,
            StoreParams {
                store_path: "unused.csv".into(),
            },
        )
        .unwrap();
        ReportService::open(store, &Config::default()).unwrap()
    }

    fn input(author: &str, goals: &[(&str, bool)], issues: &[&str]) -> ReportInput {
        ReportInput {
            author: author.into(),
            category: Category::Daily,
            date: date!(2024 - 05 - 02),
            status: Status::InProgress,
            goals: goals.iter().map(|(t, c)| GoalEntry::new(*t, *c)).collect(),
            issues: issues.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn submit_computes_rate_and_appends() {
        let svc = service();
        let r = svc
            .submit(input(
                "Kim",
                &[("Ship v1", true), ("", false), ("", false), ("", false), ("", false)],
                &["Blocked on review", "", ""],
            ))
            .unwrap();
        assert_eq!(r.completion_rate, 100);
        assert_eq!(r.goals, "[DONE] Ship v1");

        let rows = svc.reports().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].issues, "1. Blocked on review");
    }

    #[test]
    fn blank_author_is_rejected_without_writing() {
        let svc = service();
        let err = svc.submit(input("  ", &[("x", true)], &[])).unwrap_err();
        assert!(err.is_validation());
        assert!(svc.is_empty().unwrap());
    }

    #[test]
    fn all_blank_goals_are_rejected() {
        let svc = service();
        let err = svc
            .submit(input("Kim", &[("", true), (" ", false)], &["issue"]))
            .unwrap_err();
        assert!(err.to_string().contains("at least one goal"));
        assert!(svc.is_empty().unwrap());
    }

    #[test]
    fn too_many_slots_are_rejected() {
        let svc = service();
        let six = [("a", true); 6];
        assert!(svc.submit(input("Kim", &six, &[])).unwrap_err().is_validation());
        let four = ["a", "b", "c", "d"];
        assert!(
            svc.submit(input("Kim", &[("a", true)], &four))
                .unwrap_err()
                .is_validation()
        );
    }

    #[test]
    fn separator_inside_goal_is_rejected() {
        let svc = service();
        let err = svc
            .submit(input("Kim", &[("first\n\nsecond", false)], &[]))
            .unwrap_err();
        assert!(err.to_string().contains("goal 1"));
    }

    #[test]
    fn numbered_continuation_line_in_issue_is_rejected() {
        let svc = service();
        let err = svc
            .submit(input("Kim", &[("a", false)], &["late\n2. vendor"]))
            .unwrap_err();
        assert!(err.is_validation());
        // a number at the very start is harmless
        svc.submit(input("Kim", &[("a", false)], &["2. vendor"])).unwrap();
    }

    #[test]
    fn blank_line_inside_an_issue_is_accepted() {
        let svc = service();
        let r = svc
            .submit(input("Kim", &[("a", false)], &["para one\n\npara two", "late"]))
            .unwrap();
        assert_eq!(r.issues, "1. para one\n\npara two\n\n2. late");
        let draft = svc.draft(0).unwrap();
        assert_eq!(draft.issues[0], "para one\n\npara two");
        assert_eq!(draft.issues[1], "late");
    }

    #[test]
    fn update_replaces_one_row_and_recomputes_rate() {
        let svc = service();
        svc.submit(input("Kim", &[("a", false), ("b", false)], &[])).unwrap();
        svc.submit(input("Lee", &[("c", true)], &[])).unwrap();

        let updated = svc
            .update(0, input("Kim Min", &[("a", true), ("b", false), ("c", false)], &["x"]))
            .unwrap();
        assert_eq!(updated.completion_rate, 33);

        let rows = svc.reports().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], updated);
        assert_eq!(rows[1].author, "Lee");
    }

    #[test]
    fn update_out_of_range() {
        let svc = service();
        svc.submit(input("Kim", &[("a", false)], &[])).unwrap();
        let err = svc.update(3, input("Kim", &[("a", true)], &[])).unwrap_err();
        assert!(matches!(err, WorklogError::RowOutOfRange { index: 3, len: 1 }));
    }

    #[test]
    fn update_validates_before_touching_the_store() {
        let svc = service();
        svc.submit(input("Kim", &[("a", false)], &[])).unwrap();
        assert!(svc.update(0, input("", &[("a", true)], &[])).is_err());
        assert_eq!(svc.reports().unwrap()[0].author, "Kim");
    }

    #[test]
    fn draft_is_padded_and_round_trips_through_update() {
        let svc = service();
        svc.submit(input("Kim", &[("", false), ("a", true), ("b", false)], &["late"]))
            .unwrap();
        let draft = svc.draft(0).unwrap();
        assert_eq!(draft.goals.len(), 5);
        assert_eq!(draft.goals[0], GoalEntry::new("a", true));
        assert_eq!(draft.issues, vec!["late".to_string(), String::new(), String::new()]);

        let before = svc.reports().unwrap();
        svc.update(0, draft.into_input()).unwrap();
        assert_eq!(svc.reports().unwrap(), before);
    }

    #[test]
    fn summary_over_stored_rows() {
        let svc = service();
        svc.submit(input("Kim", &[("a", true), ("b", true), ("c", false)], &[]))
            .unwrap();
        svc.submit(input("Lee", &[("a", true)], &[])).unwrap();
        let s = svc.summary().unwrap();
        assert_eq!(s.reports, 2);
        assert_eq!(s.mean_rate, Some(83.0));
    }
}
