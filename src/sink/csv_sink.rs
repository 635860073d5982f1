//! CSV-backed tabular sink.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::SinkError;
use crate::sink::TabularSink;

/// Writes extraction rows to a CSV file, with the column set taken from a
/// template file's header row.
pub struct CsvSink {
    headers: Vec<String>,
    writer: csv::Writer<File>,
    output: PathBuf,
}

impl std::fmt::Debug for CsvSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSink")
            .field("headers", &self.headers)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl CsvSink {
    /// Read the template's header row and open the output file, writing the
    /// header as its first record.
    pub fn create(template: &Path, output: &Path) -> Result<Self, SinkError> {
        let mut reader =
            csv::Reader::from_path(template).map_err(|e| SinkError::Template {
                path: template.to_path_buf(),
                reason: e.to_string(),
            })?;
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| SinkError::Template {
                path: template.to_path_buf(),
                reason: e.to_string(),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut writer = csv::Writer::from_path(output)?;
        writer.write_record(&headers)?;

        Ok(Self {
            headers,
            writer,
            output: output.to_path_buf(),
        })
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }
}

impl TabularSink for CsvSink {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn append_row(&mut self, row: &[String]) -> Result<(), SinkError> {
        self.writer.write_record(row)?;
        Ok(())
    }

    fn persist(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_template(dir: &Path) -> PathBuf {
        let path = dir.join("template.csv");
        std::fs::write(&path, "Provider Name,TIN,Unknown Col\n").unwrap();
        path
    }

    #[test]
    fn reads_template_headers() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path());
        let output = dir.path().join("out.csv");

        let sink = CsvSink::create(&template, &output).unwrap();
        assert_eq!(sink.headers(), ["Provider Name", "TIN", "Unknown Col"]);
    }

    #[test]
    fn appends_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path());
        let output = dir.path().join("out.csv");

        let mut sink = CsvSink::create(&template, &output).unwrap();
        sink.append_row(&["Jane Doe".into(), "123456789".into(), "x".into()])
            .unwrap();
        sink.append_row(&["John Smith".into(), "987654321".into(), "y".into()])
            .unwrap();
        sink.persist().unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Provider Name,TIN,Unknown Col");
        assert!(lines[1].starts_with("Jane Doe"));
        assert!(lines[2].starts_with("John Smith"));
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvSink::create(
            &dir.path().join("absent.csv"),
            &dir.path().join("out.csv"),
        )
        .unwrap_err();
        assert!(matches!(err, SinkError::Template { .. }));
    }

    #[test]
    fn quotes_values_containing_commas() {
        let dir = tempfile::tempdir().unwrap();
        let template = write_template(dir.path());
        let output = dir.path().join("out.csv");

        let mut sink = CsvSink::create(&template, &output).unwrap();
        sink.append_row(&["Doe, Jane".into(), "123".into(), "".into()])
            .unwrap();
        sink.persist().unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("\"Doe, Jane\""));
    }
}
