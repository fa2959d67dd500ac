use crate::error::Result;
use crate::repo::{RecordStore, StoreParams};
use crate::repo_fs::CsvRecordStore;
use crate::repo_mem::MemRecordStore;

pub enum Backend {
    Csv,
    Memory,
}

pub fn open_store(backend: Backend, p: StoreParams) -> Result<Box<dyn RecordStore>> {
    match backend {
        Backend::Csv => Ok(Box::new(CsvRecordStore::new(p))),
        Backend::Memory => Ok(Box::new(MemRecordStore::new())),
    }
}
