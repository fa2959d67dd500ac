// worklog_core/src/repo.rs
use crate::domain::Report;
use crate::error::Result;

#[derive(Clone, Debug)]
pub struct StoreParams {
    pub store_path: std::path::PathBuf,
}

/// Ordered report rows; a row's position is its only identity.
///
/// There is no locking between writers. A `rewrite_all` racing an `append`
/// or another rewrite keeps whichever write lands last.
pub trait RecordStore: Send + Sync {
    /// Create an empty store (header only) unless one already exists.
    fn initialize(&self) -> Result<()>;

    fn append(&self, report: &Report) -> Result<()>;

    /// Fails with `NotFound` when the store does not exist.
    fn load_all(&self) -> Result<Vec<Report>>;

    /// Replace every row with `reports`, in order.
    fn rewrite_all(&self, reports: &[Report]) -> Result<()>;

    /// A missing store counts as empty.
    fn is_empty(&self) -> Result<bool>;
}
