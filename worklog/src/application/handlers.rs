use std::path::PathBuf;

use serde::Serialize;
use time::OffsetDateTime;
use worklog_core::domain::format_date;
use worklog_core::error::{Result, WorklogError};
use worklog_core::{
    AdminGate, Backend, Category, Config, GoalEntry, Report, ReportDraft, ReportInput,
    ReportService, Status, StoreParams, Summary, open_store,
};

use crate::presentation::cli::ReportArgs;

pub fn load_config(
    config_path: Option<PathBuf>,
    store: Option<PathBuf>,
    admin_secret: Option<String>,
) -> Result<Config> {
    let mut cfg = match config_path {
        Some(p) => Config::load(&p)?,
        None => Config::default(),
    };
    if let Some(s) = store {
        cfg.store_path = s;
    }
    if let Some(s) = admin_secret {
        cfg.admin_secret = Some(s);
    }
    tracing::debug!(store = %cfg.store_path.display(), "configuration loaded");
    Ok(cfg)
}

#[derive(Serialize)]
struct DashboardView<'a> {
    reports: &'a [Report],
    summary: &'a Summary,
}

fn service_from_config(cfg: &Config) -> Result<ReportService> {
    let store = open_store(
        Backend::Csv,
        StoreParams {
            store_path: cfg.store_path.clone(),
        },
    )?;
    ReportService::open(store, cfg)
}

fn today() -> time::Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Flag the 1-based slots in `done` as complete.
fn apply_done(goals: &mut [GoalEntry], done: &[usize]) -> Result<()> {
    for &n in done {
        let goal = n
            .checked_sub(1)
            .and_then(|i| goals.get_mut(i))
            .ok_or_else(|| {
                WorklogError::validation(format!("--done {n}: no goal in slot {n}"))
            })?;
        if goal.is_blank() {
            return Err(WorklogError::validation(format!(
                "--done {n}: goal slot {n} is empty"
            )));
        }
        goal.completed = true;
    }
    Ok(())
}

fn new_input(args: ReportArgs) -> Result<ReportInput> {
    let mut goals: Vec<GoalEntry> = args
        .goals
        .into_iter()
        .map(|t| GoalEntry::new(t, false))
        .collect();
    apply_done(&mut goals, &args.done)?;
    Ok(ReportInput {
        author: args.author.unwrap_or_default(),
        category: args.category.unwrap_or(Category::Daily),
        date: args.date.unwrap_or_else(today),
        status: args.status.unwrap_or(Status::InProgress),
        goals,
        issues: args.issues,
    })
}

fn edited_input(draft: ReportDraft, args: ReportArgs, clear_done: bool) -> Result<ReportInput> {
    let mut goals = if args.goals.is_empty() {
        draft.goals
    } else {
        args.goals
            .into_iter()
            .map(|t| GoalEntry::new(t, false))
            .collect()
    };
    if clear_done {
        goals.iter_mut().for_each(|g| g.completed = false);
    }
    apply_done(&mut goals, &args.done)?;
    Ok(ReportInput {
        author: args.author.unwrap_or(draft.author),
        category: args.category.unwrap_or(draft.category),
        date: args.date.unwrap_or(draft.date),
        status: args.status.unwrap_or(draft.status),
        goals,
        issues: if args.issues.is_empty() {
            draft.issues
        } else {
            args.issues
        },
    })
}

pub fn handle_init(cfg: &Config) -> Result<()> {
    service_from_config(cfg)?;
    eprintln!("init: report store at {}", cfg.store_path.display());
    Ok(())
}

pub fn handle_submit(cfg: &Config, args: ReportArgs) -> Result<()> {
    let svc = service_from_config(cfg)?;
    let report = svc.submit(new_input(args)?)?;
    eprintln!(
        "submit: saved report by {} ({}%)",
        report.author, report.completion_rate
    );
    Ok(())
}

pub fn handle_edit(cfg: &Config, index: usize, args: ReportArgs, clear_done: bool) -> Result<()> {
    let svc = service_from_config(cfg)?;
    let draft = svc.draft(index)?;
    let report = svc.update(index, edited_input(draft, args, clear_done)?)?;
    eprintln!(
        "edit: updated report #{index} ({}%)",
        report.completion_rate
    );
    Ok(())
}

pub fn handle_show(cfg: &Config, index: usize) -> Result<()> {
    let svc = service_from_config(cfg)?;
    let d = svc.draft(index)?;
    println!(
        "#{} {} {} {} {} {}%",
        d.index,
        format_date(d.date),
        d.author,
        d.category,
        d.status,
        d.completion_rate
    );
    println!("goals:");
    for (i, g) in d.goals.iter().enumerate() {
        let mark = if g.completed { "x" } else { " " };
        println!("  {}. [{mark}] {}", i + 1, indent(&g.text));
    }
    println!("issues:");
    for (i, issue) in d.issues.iter().enumerate() {
        println!("  {}. {}", i + 1, indent(issue));
    }
    Ok(())
}

pub fn handle_list(cfg: &Config) -> Result<()> {
    let svc = service_from_config(cfg)?;
    match svc.reports() {
        Ok(rows) if rows.is_empty() => println!("no reports yet"),
        Ok(rows) => print_rows(&rows),
        Err(e) if e.is_not_found() => println!("no reports yet"),
        Err(e) => return Err(e),
    }
    Ok(())
}

pub fn handle_dashboard(cfg: &Config, secret: &str, json: bool) -> Result<()> {
    let Some(expected) = cfg.admin_secret.as_deref() else {
        eprintln!("dashboard: no admin secret configured (set admin_secret or WORKLOG_ADMIN_SECRET)");
        return Err(WorklogError::Unauthorized);
    };
    AdminGate::new(expected).check(secret)?;

    let svc = service_from_config(cfg)?;
    let rows = svc.reports()?;
    let summary = Summary::from_reports(&rows);
    if json {
        let out = DashboardView {
            reports: &rows,
            summary: &summary,
        };
        let text = serde_json::to_string_pretty(&out).map_err(std::io::Error::from)?;
        println!("{text}");
        return Ok(());
    }

    if rows.is_empty() {
        println!("no reports yet");
        return Ok(());
    }
    print_rows(&rows);
    println!();
    println!(
        "reports: {}  done: {}  average completion: {}",
        summary.reports,
        summary.done,
        summary.mean_rate_label()
    );
    for (cat, b) in &summary.by_category {
        println!("  {:<8} {:>4} reports  {:>5.1}%", cat, b.reports, b.mean_rate);
    }
    for (author, b) in &summary.by_author {
        println!("  {:<12} {:>4} reports  {:>5.1}%", author, b.reports, b.mean_rate);
    }
    Ok(())
}

fn print_rows(rows: &[Report]) {
    for (i, r) in rows.iter().enumerate() {
        println!(
            "#{:<4} {}  {:<12} {:<8} {:<12} {:>3}%",
            i,
            format_date(r.date),
            r.author,
            r.category,
            r.status,
            r.completion_rate
        );
    }
}

// continuation lines line up under the slot text
fn indent(text: &str) -> String {
    text.replace('\n', "\n         ")
}
