use crate::generator::ReadRecord;
use anyhow::{Context, Result};
use std::io::Write;

/// Emits the four-line record format consumed downstream:
/// `>accession-index`, sequence, `+`, quality string.
pub struct ReadWriter<W: Write> {
    writer: W,
    error_free: bool,
}

impl<W: Write> ReadWriter<W> {
    pub fn new(writer: W, error_free: bool) -> Self {
        Self { writer, error_free }
    }

    pub fn write_record(&mut self, record: &ReadRecord) -> Result<()> {
        let sequence = if self.error_free {
            &record.plain
        } else {
            &record.errored
        };
        writeln!(self.writer, ">{}-{}", record.accession, record.index)
            .context("Failed to write read header")?;
        self.writer.write_all(sequence)?;
        writeln!(self.writer, "\n+")?;
        self.writer.write_all(&record.quality)?;
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush output")
    }
}
