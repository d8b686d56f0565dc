use crate::domain::model::{DivergenceRecord, HEADER};
use crate::utils::error::Result;
use std::io::Write;

/// Tab-separated record writer. Every row is flushed as soon as it is written.
pub struct RecordWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(inner: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    pub fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(HEADER)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &DivergenceRecord) -> Result<()> {
        self.writer.write_record(record.fields())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        self.writer.get_ref()
    }
}
