use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Category, Report, Status};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Bucket {
    pub reports: u64,
    pub mean_rate: f64,
}

/// Dashboard figures over every stored report.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub reports: u64,
    pub done: u64,
    /// Mean completion rate; `None` when there are no reports.
    pub mean_rate: Option<f64>,
    pub by_category: BTreeMap<Category, Bucket>,
    pub by_author: BTreeMap<String, Bucket>,
}

impl Summary {
    pub fn from_reports(reports: &[Report]) -> Self {
        let mut s = Summary::default();
        let mut total = 0u64;
        let mut cat_sums: BTreeMap<Category, u64> = BTreeMap::new();
        let mut author_sums: BTreeMap<String, u64> = BTreeMap::new();

        for r in reports {
            let rate = u64::from(r.completion_rate);
            s.reports += 1;
            total += rate;
            if r.status == Status::Done {
                s.done += 1;
            }
            s.by_category.entry(r.category).or_default().reports += 1;
            *cat_sums.entry(r.category).or_default() += rate;
            let author = r.author.trim().to_string();
            s.by_author.entry(author.clone()).or_default().reports += 1;
            *author_sums.entry(author).or_default() += rate;
        }

        if s.reports > 0 {
            s.mean_rate = Some(total as f64 / s.reports as f64);
        }
        for (cat, b) in s.by_category.iter_mut() {
            b.mean_rate = cat_sums[cat] as f64 / b.reports as f64;
        }
        for (author, b) in s.by_author.iter_mut() {
            b.mean_rate = author_sums[author] as f64 / b.reports as f64;
        }
        s
    }

    /// One-decimal percentage as shown on the dashboard, e.g. `"66.7%"`.
    pub fn mean_rate_label(&self) -> String {
        match self.mean_rate {
            Some(m) => format!("{m:.1}%"),
            None => "n/a".to_string(),
        }
    }
}
