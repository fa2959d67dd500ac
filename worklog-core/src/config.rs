use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::codec::{GoalCodec, IssueCodec, SlotCodec};
use crate::error::{Result, WorklogError};

pub const DEFAULT_STORE_FILE: &str = "work_logs.csv";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store_path: PathBuf,
    /// Shared secret for the dashboard. `None` keeps the dashboard closed.
    pub admin_secret: Option<String>,
    pub goal_slots: usize,
    pub issue_slots: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            admin_secret: None,
            goal_slots: GoalCodec::DEFAULT_SLOTS,
            issue_slots: IssueCodec::DEFAULT_SLOTS,
        }
    }
}

impl Config {
    /// Read a TOML config file; absent keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&raw)
            .map_err(|e| WorklogError::Parse(format!("config {}: {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.goal_slots == 0 || self.issue_slots == 0 {
            return Err(WorklogError::validation(
                "goal_slots and issue_slots must be at least 1",
            ));
        }
        Ok(())
    }
}
