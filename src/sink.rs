use std::io::{self, Write};
use std::sync::Mutex;

use crate::record::HarvestedRecord;

/// Receives records as chains produce them. Shared by every chain of a run.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: HarvestedRecord) -> io::Result<()>;
}

/// Keeps records in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: Mutex<Vec<HarvestedRecord>>,
}

impl CollectingSink {
    pub fn into_records(self) -> Vec<HarvestedRecord> {
        self.records.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl RecordSink for CollectingSink {
    fn emit(&self, record: HarvestedRecord) -> io::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record);
        Ok(())
    }
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        JsonLinesSink {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|e| e.into_inner())
    }
}

impl<W: Write + Send> RecordSink for JsonLinesSink<W> {
    fn emit(&self, record: HarvestedRecord) -> io::Result<()> {
        let line = serde_json::to_string(&record)?;
        let mut out = self.out.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(out, "{line}")?;
        out.flush()
    }
}
