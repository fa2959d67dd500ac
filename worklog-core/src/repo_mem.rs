use std::sync::{Mutex, MutexGuard};

use crate::domain::Report;
use crate::error::Result;
use crate::repo::RecordStore;

/// Process-local store. `None` until initialized, mirroring a missing file.
#[derive(Debug)]
pub struct MemRecordStore {
    rows: Mutex<Option<Vec<Report>>>,
    path: std::path::PathBuf,
}

impl MemRecordStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(None),
            path: std::path::PathBuf::from("<memory>"),
        }
    }

    fn rows(&self) -> MutexGuard<'_, Option<Vec<Report>>> {
        // every write is a single push or assignment, so poisoned rows are intact
        self.rows.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn missing(&self) -> crate::error::WorklogError {
        crate::error::WorklogError::NotFound(self.path.clone())
    }
}

impl Default for MemRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemRecordStore {
    fn initialize(&self) -> Result<()> {
        self.rows().get_or_insert_with(Vec::new);
        Ok(())
    }

    fn append(&self, report: &Report) -> Result<()> {
        match self.rows().as_mut() {
            Some(rows) => {
                rows.push(report.clone());
                Ok(())
            }
            None => Err(self.missing()),
        }
    }

    fn load_all(&self) -> Result<Vec<Report>> {
        self.rows().clone().ok_or_else(|| self.missing())
    }

    fn rewrite_all(&self, reports: &[Report]) -> Result<()> {
        *self.rows() = Some(reports.to_vec());
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        Ok(self.rows().as_ref().is_none_or(|r| r.is_empty()))
    }
}
