use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

use batch_config::shared::DelimitedSourceConfig;

use crate::bail;
use crate::error::{BatchResult, ErrorKind};
use crate::source::RecordSource;
use crate::types::{Cell, Record};

/// A [`RecordSource`] reading delimited text files line by line.
///
/// Each non-empty line is split on the configured delimiter and must yield
/// exactly one field per configured field name. A line with the wrong number
/// of fields fails the read immediately; there is no skip policy.
#[derive(Debug)]
pub struct DelimitedFileSource {
    config: DelimitedSourceConfig,
    lines: Option<Lines<BufReader<File>>>,
    line_number: u64,
}

impl DelimitedFileSource {
    /// Creates a new source for the file named in `config`.
    ///
    /// The file is not touched until [`RecordSource::open`] is called.
    pub fn new(config: DelimitedSourceConfig) -> Self {
        Self {
            config,
            lines: None,
            line_number: 0,
        }
    }

    fn parse_line(&self, line: &str) -> BatchResult<Record> {
        let fields: Vec<&str> = line.split(self.config.delimiter).collect();

        if fields.len() != self.config.field_names.len() {
            bail!(
                ErrorKind::MalformedRecord,
                "A line in the source file does not match the configured fields",
                format!(
                    "file `{}` line {} has {} fields, expected {}",
                    self.config.path.display(),
                    self.line_number,
                    fields.len(),
                    self.config.field_names.len()
                )
            );
        }

        let values = fields
            .into_iter()
            .map(|field| Cell::String(field.to_string()))
            .collect();

        Ok(Record::new(values))
    }
}

impl RecordSource for DelimitedFileSource {
    async fn open(&mut self) -> BatchResult<()> {
        let file = File::open(&self.config.path).await?;
        self.lines = Some(BufReader::new(file).lines());
        self.line_number = 0;

        Ok(())
    }

    async fn next(&mut self) -> BatchResult<Option<Record>> {
        let Some(lines) = self.lines.as_mut() else {
            bail!(
                ErrorKind::InvalidState,
                "The delimited file source was read before being opened"
            );
        };

        loop {
            let Some(line) = lines.next_line().await? else {
                return Ok(None);
            };
            self.line_number += 1;

            // Blank lines carry no record but still advance the line counter.
            if line.trim().is_empty() {
                continue;
            }

            return self.parse_line(&line).map(Some);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    fn source_config(path: PathBuf) -> DelimitedSourceConfig {
        DelimitedSourceConfig {
            path,
            delimiter: ',',
            field_names: vec![
                "first_name".to_string(),
                "last_name".to_string(),
                "city".to_string(),
            ],
        }
    }

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();

        file
    }

    #[tokio::test]
    async fn reads_all_rows_in_order() {
        let file = write_file("Jane,Doe,Lisbon\nJohn,Smith,Porto\n");
        let mut source = DelimitedFileSource::new(source_config(file.path().to_path_buf()));

        source.open().await.unwrap();

        let first = source.next().await.unwrap().unwrap();
        assert_eq!(first.values[0], Cell::String("Jane".to_string()));
        assert_eq!(first.values[2], Cell::String("Lisbon".to_string()));

        let second = source.next().await.unwrap().unwrap();
        assert_eq!(second.values[1], Cell::String("Smith".to_string()));

        assert!(source.next().await.unwrap().is_none());
        assert!(source.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let file = write_file("Jane,Doe,Lisbon\n\n  \nJohn,Smith,Porto\n");
        let mut source = DelimitedFileSource::new(source_config(file.path().to_path_buf()));

        source.open().await.unwrap();

        assert!(source.next().await.unwrap().is_some());
        assert!(source.next().await.unwrap().is_some());
        assert!(source.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn wrong_field_count_fails_the_read() {
        let file = write_file("Jane,Doe,Lisbon\nJohn,Smith\n");
        let mut source = DelimitedFileSource::new(source_config(file.path().to_path_buf()));

        source.open().await.unwrap();
        source.next().await.unwrap();

        let err = source.next().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedRecord);
    }

    #[tokio::test]
    async fn reopening_restarts_from_the_beginning() {
        let file = write_file("Jane,Doe,Lisbon\nJohn,Smith,Porto\n");
        let mut source = DelimitedFileSource::new(source_config(file.path().to_path_buf()));

        source.open().await.unwrap();
        source.next().await.unwrap();

        source.open().await.unwrap();
        let first = source.next().await.unwrap().unwrap();
        assert_eq!(first.values[0], Cell::String("Jane".to_string()));
    }

    #[tokio::test]
    async fn missing_file_fails_on_open() {
        let mut source =
            DelimitedFileSource::new(source_config(PathBuf::from("/nonexistent/people.csv")));

        let err = source.open().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SourceIoError);
    }

    #[tokio::test]
    async fn reading_before_open_is_an_invalid_state() {
        let file = write_file("Jane,Doe,Lisbon\n");
        let mut source = DelimitedFileSource::new(source_config(file.path().to_path_buf()));

        let err = source.next().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}
