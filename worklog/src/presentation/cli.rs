use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use time::Date;
use worklog_core::{Category, Status};

#[derive(Parser)]
#[command(author, version, about = "worklog: periodic work-status reports", long_about = None)]
pub struct Cli {
    /// TOML config file (store_path, admin_secret, goal_slots, issue_slots)
    #[arg(long, global = true, env = "WORKLOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report store (CSV); overrides the config file
    #[arg(long, global = true, env = "WORKLOG_STORE")]
    pub store: Option<PathBuf>,

    /// Secret that unlocks the dashboard; overrides the config file
    #[arg(long, global = true, env = "WORKLOG_ADMIN_SECRET", hide_env_values = true)]
    pub admin_secret: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
pub struct ReportArgs {
    #[arg(long)]
    pub author: Option<String>,

    /// daily, weekly or monthly
    #[arg(long)]
    pub category: Option<Category>,

    /// YYYY-MM-DD (defaults to today on submit)
    #[arg(long, value_parser = parse_date_arg)]
    pub date: Option<Date>,

    /// in-progress or done
    #[arg(long)]
    pub status: Option<Status>,

    /// goal text, one per slot in order (repeatable)
    #[arg(long = "goal")]
    pub goals: Vec<String>,

    /// 1-based goal slot to mark complete (repeatable)
    #[arg(long = "done")]
    pub done: Vec<usize>,

    /// unmet-goal reason or issue (repeatable)
    #[arg(long = "issue")]
    pub issues: Vec<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the report store if it does not exist
    Init,

    /// Submit a new report
    Submit {
        #[command(flatten)]
        report: ReportArgs,
    },

    /// Edit the report at a row index; omitted fields keep their stored values
    Edit {
        index: usize,

        #[command(flatten)]
        report: ReportArgs,

        /// clear every completion flag before applying --done
        #[arg(long)]
        clear_done: bool,
    },

    /// Show the goal and issue slots of one report
    Show { index: usize },

    /// List stored reports
    List,

    /// All reports with the average completion rate (needs the admin secret)
    Dashboard {
        /// secret to check against the admin secret
        #[arg(
            long,
            env = "WORKLOG_DASHBOARD_SECRET",
            hide_env_values = true,
            default_value = ""
        )]
        secret: String,

        /// print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn parse_date_arg(s: &str) -> Result<Date, String> {
    worklog_core::domain::parse_date(s).map_err(|e| e.to_string())
}
