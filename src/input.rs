//! Batched URL input.
//!
//! Reads a line-oriented source lazily and hands it out in bounded batches,
//! so memory stays proportional to the batch size rather than the list size.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Forward-only reader that yields batches of trimmed, non-empty lines.
///
/// Lines are decoded leniently: invalid UTF-8 is replaced rather than
/// aborting the run, and the resulting line is left for the normalizer to
/// reject.
pub struct BatchReader {
    reader: Box<dyn AsyncBufRead + Send + Unpin>,
    batch_size: usize,
    buf: Vec<u8>,
    exhausted: bool,
}

impl BatchReader {
    /// Opens `path` for reading; `-` reads standard input.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened. Callers treat this as
    /// fatal for the whole run.
    pub async fn open(path: &Path, batch_size: usize) -> Result<Self> {
        if path.as_os_str() == "-" {
            info!("Reading URLs from stdin");
            return Ok(Self::from_reader(
                BufReader::new(tokio::io::stdin()),
                batch_size,
            ));
        }
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open input file {}", path.display()))?;
        info!("Reading URLs from {}", path.display());
        Ok(Self::from_reader(BufReader::new(file), batch_size))
    }

    /// Wraps any buffered async reader.
    pub fn from_reader<R>(reader: R, batch_size: usize) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        BatchReader {
            reader: Box::new(reader),
            batch_size: batch_size.max(1),
            buf: Vec::new(),
            exhausted: false,
        }
    }

    /// Returns the next batch, or `None` once the source is exhausted.
    ///
    /// Every batch except the last holds exactly `batch_size` lines.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the underlying reader.
    pub async fn next_batch(&mut self) -> std::io::Result<Option<Vec<String>>> {
        let mut batch = Vec::with_capacity(self.batch_size);
        while !self.exhausted && batch.len() < self.batch_size {
            self.buf.clear();
            let read = self.reader.read_until(b'\n', &mut self.buf).await?;
            if read == 0 {
                self.exhausted = true;
                break;
            }
            let line = String::from_utf8_lossy(&self.buf);
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                batch.push(trimmed.to_string());
            }
        }

        if batch.is_empty() {
            Ok(None)
        } else {
            Ok(Some(batch))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    async fn collect(reader: &mut BatchReader) -> Vec<Vec<String>> {
        let mut batches = Vec::new();
        while let Some(batch) = reader.next_batch().await.expect("read") {
            batches.push(batch);
        }
        batches
    }

    #[tokio::test]
    async fn test_batches_preserve_order_and_size() {
        let input = "a.com\nb.com\nc.com\nd.com\ne.com\n";
        let mut reader = BatchReader::from_reader(Cursor::new(input), 2);
        let batches = collect(&mut reader).await;
        assert_eq!(
            batches,
            vec![
                vec!["a.com".to_string(), "b.com".to_string()],
                vec!["c.com".to_string(), "d.com".to_string()],
                vec!["e.com".to_string()],
            ]
        );
    }

    #[tokio::test]
    async fn test_blank_lines_and_whitespace_are_dropped() {
        let input = "  a.com  \r\n\n   \n\tb.com\n";
        let mut reader = BatchReader::from_reader(Cursor::new(input), 10);
        let batches = collect(&mut reader).await;
        assert_eq!(batches, vec![vec!["a.com".to_string(), "b.com".to_string()]]);
    }

    #[tokio::test]
    async fn test_last_line_without_newline() {
        let mut reader = BatchReader::from_reader(Cursor::new("a.com\nb.com"), 5);
        let batches = collect(&mut reader).await;
        assert_eq!(batches, vec![vec!["a.com".to_string(), "b.com".to_string()]]);
    }

    #[tokio::test]
    async fn test_empty_source_yields_nothing() {
        let mut reader = BatchReader::from_reader(Cursor::new(""), 5);
        assert!(reader.next_batch().await.expect("read").is_none());
        // Exhaustion is sticky
        assert!(reader.next_batch().await.expect("read").is_none());
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced_not_fatal() {
        let bytes: Vec<u8> = b"ok.com\n\xff\xfe.com\nnext.com\n".to_vec();
        let mut reader = BatchReader::from_reader(Cursor::new(bytes), 10);
        let batches = collect(&mut reader).await;
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[0][2], "next.com");
    }

    #[tokio::test]
    async fn test_open_missing_file_is_error() {
        let result = BatchReader::open(Path::new("/nonexistent/urls.txt"), 10).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_open_file() {
        use std::io::Write;
        let mut tmp = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(tmp, "one.com\ntwo.com").expect("write");
        let mut reader = BatchReader::open(tmp.path(), 1).await.expect("open");
        let batches = collect(&mut reader).await;
        assert_eq!(batches.len(), 2);
    }
}
