use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, WriterBuilder};

use crate::domain::{Report, format_date, parse_date};
use crate::error::{Result, WorklogError};
use crate::repo::{RecordStore, StoreParams};

pub const HEADER: [&str; 7] = [
    "date", "author", "category", "goals", "status", "rate", "issues",
];

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Comma-separated file store. Columns are matched by position, so files
/// written with a localized header load the same way.
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(params: StoreParams) -> Self {
        Self {
            path: params.store_path,
        }
    }

    fn write_header(&self, f: File) -> Result<()> {
        let mut w = WriterBuilder::new().has_headers(false).from_writer(f);
        w.write_record(HEADER)?;
        w.flush()?;
        Ok(())
    }
}

impl RecordStore for CsvRecordStore {
    fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(f) => {
                self.write_header(f)?;
                tracing::debug!(path = %self.path.display(), "created report store");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                // A headerless file would swallow the first appended row as its header.
                if is_blank(&std::fs::read(&self.path)?) {
                    let f = OpenOptions::new()
                        .write(true)
                        .truncate(true)
                        .open(&self.path)?;
                    self.write_header(f)?;
                    tracing::debug!(path = %self.path.display(), "wrote header into blank report store");
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn append(&self, report: &Report) -> Result<()> {
        let mut f = match OpenOptions::new().read(true).append(true).open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WorklogError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        if f.metadata()?.len() > 0 {
            let mut last = [0u8; 1];
            f.seek(SeekFrom::End(-1))?;
            f.read_exact(&mut last)?;
            if last[0] != b'\n' {
                f.write_all(b"\n")?;
            }
        }
        let mut w = WriterBuilder::new().has_headers(false).from_writer(f);
        w.write_record(to_record(report))?;
        w.flush()?;
        tracing::debug!(path = %self.path.display(), author = %report.author, "appended report");
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<Report>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WorklogError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        if is_blank(&bytes) {
            return Ok(Vec::new());
        }
        let data = bytes.strip_prefix(BOM).unwrap_or(&bytes);

        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(data);
        let width = rdr.headers()?.len();
        if width != HEADER.len() {
            return Err(WorklogError::parse_at(
                Some(1),
                format!("expected {} columns, header has {width}", HEADER.len()),
            ));
        }

        let mut out = Vec::new();
        for rec in rdr.records() {
            let rec = rec?;
            let line = rec.position().map(|p| p.line());
            out.push(from_record(&rec).map_err(|e| match e {
                WorklogError::Parse(msg) => WorklogError::parse_at(line, msg),
                other => other,
            })?);
        }
        tracing::debug!(path = %self.path.display(), rows = out.len(), "loaded reports");
        Ok(out)
    }

    fn rewrite_all(&self, reports: &[Report]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        {
            let mut w = WriterBuilder::new().has_headers(false).from_writer(&mut tmp);
            w.write_record(HEADER)?;
            for r in reports {
                w.write_record(to_record(r))?;
            }
            w.flush()?;
        }
        // keep the store's mode; temp files start owner-only
        match std::fs::metadata(&self.path) {
            Ok(md) => tmp.as_file().set_permissions(md.permissions())?,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        tracing::debug!(path = %self.path.display(), rows = reports.len(), "rewrote report store");
        Ok(())
    }

    fn is_empty(&self) -> Result<bool> {
        match self.load_all() {
            Ok(rows) => Ok(rows.is_empty()),
            Err(WorklogError::NotFound(_)) => Ok(true),
            Err(e) => Err(e),
        }
    }
}

/// Nothing but an optional BOM and whitespace: no header, no rows.
fn is_blank(bytes: &[u8]) -> bool {
    bytes
        .strip_prefix(BOM)
        .unwrap_or(bytes)
        .iter()
        .all(u8::is_ascii_whitespace)
}

fn to_record(r: &Report) -> [String; 7] {
    [
        format_date(r.date),
        r.author.clone(),
        r.category.to_string(),
        r.goals.clone(),
        r.status.to_string(),
        r.completion_rate.to_string(),
        r.issues.clone(),
    ]
}

fn from_record(rec: &StringRecord) -> Result<Report> {
    let field = |i: usize| rec.get(i).unwrap_or_default();
    Ok(Report {
        date: parse_date(field(0))?,
        author: field(1).to_string(),
        category: field(2).parse()?,
        goals: field(3).to_string(),
        status: field(4).parse()?,
        completion_rate: parse_rate(field(5))?,
        issues: field(6).to_string(),
    })
}

fn parse_rate(s: &str) -> Result<u8> {
    let s = s.trim();
    // Some spreadsheet round-trips turn integer columns into "66.0".
    let v: f64 = s
        .parse()
        .map_err(|_| WorklogError::Parse(format!("invalid rate \"{s}\"")))?;
    if !(0.0..=100.0).contains(&v) {
        return Err(WorklogError::Parse(format!("rate {s} outside 0-100")));
    }
    Ok(v.trunc() as u8)
}
