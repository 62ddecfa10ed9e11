//! Record serialization to the output stream.

use std::io::Write;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::github::error::{SearchError, SearchResult};
use crate::github::types::RepoRecord;

/// Receives yielded records one at a time.
///
/// A sink failure is fatal: the caller stops producing output as soon
/// as a write or flush reports an error.
pub trait RecordSink {
    fn write_record(&mut self, record: &RepoRecord) -> SearchResult<()>;
    fn flush(&mut self) -> SearchResult<()>;
}

fn render_timestamp(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}

/// CSV sink with the fixed field order: owner, name, id, stars, forks,
/// size, created, updated, pushed, archived. Absent timestamps render
/// as empty strings. No header row is emitted.
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new().has_headers(false).from_writer(out),
        }
    }

    /// Flush and recover the underlying writer.
    pub fn into_inner(self) -> SearchResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| SearchError::Output(e.into_error().into()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &RepoRecord) -> SearchResult<()> {
        let (owner, name) = record.owner_and_name();
        self.writer.write_record([
            owner,
            name,
            &record.database_id.to_string(),
            &record.stargazer_count.to_string(),
            &record.fork_count.to_string(),
            &record.disk_usage.to_string(),
            &render_timestamp(record.created_at),
            &render_timestamp(record.updated_at),
            &render_timestamp(record.pushed_at),
            &render_timestamp(record.archived_at),
        ])?;
        Ok(())
    }

    fn flush(&mut self) -> SearchResult<()> {
        self.writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}
