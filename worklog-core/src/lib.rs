#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod gate;
pub mod rate;
pub mod stats;

pub mod codec;

pub mod repo;
pub mod repo_factory;
pub mod repo_fs;
pub mod repo_mem;

pub mod service;

// Re-exports: stable API surface
pub use codec::{GoalCodec, IssueCodec, SlotCodec};
pub use config::Config;
pub use domain::{Category, GoalEntry, Report, ReportDraft, ReportInput, Status};
pub use error::{Result, WorklogError};
pub use gate::AdminGate;
pub use rate::completion_rate;
pub use repo::{RecordStore, StoreParams};
pub use repo_factory::{Backend, open_store};
pub use service::ReportService;
pub use stats::Summary;
