//! Record store - append-only barcode records in a flat text file
//!
//! One record per line: `<code>\t<visual>\n`. Lines without a tab are
//! skipped on read, and a full scan stops after `max_records` records.

use crate::domain::{Record, StoreError};
use crate::infra::Config;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const SEPARATOR: char = '\t';

/// Worst-case UTF-8 width of one character
const MAX_CHAR_BYTES: u64 = 4;

pub struct RecordStore {
    path: PathBuf,
    max_records: usize,
    max_line_len: usize,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, max_records: usize, max_line_len: usize) -> Self {
        let path = path.into();
        info!(path = %path.display(), max_records, max_line_len, "record_store_initialized");
        Self { path, max_records, max_line_len }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.store_path(), config.max_records(), config.max_line_len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, preserving existing content
    pub fn append(&self, record: &Record) -> Result<(), StoreError> {
        if has_delimiter(&record.code) {
            return Err(StoreError::InvalidField { field: "code" });
        }
        if has_delimiter(&record.visual) {
            return Err(StoreError::InvalidField { field: "visual" });
        }

        let line = format!("{}{SEPARATOR}{}", record.code, record.visual);
        let len = line.chars().count();
        if len > self.max_line_len {
            return Err(StoreError::LineTooLong { len, max: self.max_line_len });
        }

        self.append_line(&line).map_err(|source| self.io_error(source))?;
        debug!(file = %self.path.display(), code = %record.code, bytes = line.len(), "record_appended");
        Ok(())
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        // Create parent directories if they don't exist
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        writeln!(file, "{}", line)
    }

    /// Read records in file order, up to `max_records`
    ///
    /// A missing file means no records yet, not an error.
    pub fn read_all(&self) -> Result<Vec<Record>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(file = %self.path.display(), "record_store_missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        // Longest byte run that can still hold `max_line_len` chars plus a '\r'
        let byte_limit = (self.max_line_len as u64).saturating_mul(MAX_CHAR_BYTES).saturating_add(2);

        let mut reader = BufReader::new(file);
        let mut bytes = Vec::new();
        let mut records = Vec::new();
        let mut line_no = 0usize;
        loop {
            if records.len() >= self.max_records {
                debug!(max_records = self.max_records, "record_limit_reached");
                break;
            }

            let line = read_line_bounded(&mut reader, &mut bytes, byte_limit)
                .map_err(|source| self.io_error(source))?;
            let Some(truncated) = line else { break };
            line_no += 1;

            if truncated {
                warn!(line = line_no, max_line_len = self.max_line_len, "record_line_too_long");
                continue;
            }

            let text = String::from_utf8_lossy(&bytes);
            let text = text.strip_suffix('\r').unwrap_or(&*text);

            if text.chars().count() > self.max_line_len {
                warn!(line = line_no, max_line_len = self.max_line_len, "record_line_too_long");
                continue;
            }

            match text.split_once(SEPARATOR) {
                Some((code, visual)) => records.push(Record::new(code, visual)),
                None => debug!(line = line_no, "record_line_skipped"),
            }
        }

        debug!(file = %self.path.display(), count = records.len(), "records_read");
        Ok(records)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io { path: self.path.clone(), source }
    }
}

fn has_delimiter(field: &str) -> bool {
    field.contains(['\t', '\n', '\r'])
}

/// Read the next line into `buf` without its `'\n'`, buffering at most `limit` bytes
///
/// Returns `None` at end of input and `Some(true)` when the line hit `limit`;
/// the rest of such a line is consumed and dropped.
fn read_line_bounded<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>, limit: u64) -> io::Result<Option<bool>> {
    buf.clear();
    let read = reader.by_ref().take(limit).read_until(b'\n', buf)?;
    if read == 0 {
        return Ok(None);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        return Ok(Some(false));
    }
    if (read as u64) < limit {
        // Last line, no trailing newline
        return Ok(Some(false));
    }

    buf.clear();
    skip_line(reader)?;
    Ok(Some(true))
}

fn skip_line<R: BufRead>(reader: &mut R) -> io::Result<()> {
    loop {
        let available = reader.fill_buf()?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn store_at(path: &Path) -> RecordStore {
        RecordStore::new(path, 200, 2000)
    }

    #[test]
    fn test_append_then_read_in_order() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir.path().join("barcode.txt"));

        store.append(&Record::new("07", "| | |")).unwrap();
        store.append(&Record::new("123", "||  |")).unwrap();

        let records = store.read_all().unwrap();
        assert_eq!(records, vec![Record::new("07", "| | |"), Record::new("123", "||  |")]);
    }

    #[test]
    fn test_line_format() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        store_at(&path).append(&Record::new("5", "| |")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "5\t| |\n");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = store_at(&dir.path().join("absent.txt"));
        assert!(store.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_skips_lines_without_separator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, "abc\n1\t| |\n\n2\t||\n").unwrap();

        let records = store_at(&path).read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].code, "1");
        assert_eq!(records[1].code, "2");
    }

    #[test]
    fn test_splits_on_first_separator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, "12\ta\tb\n").unwrap();

        let records = store_at(&path).read_all().unwrap();
        assert_eq!(records, vec![Record::new("12", "a\tb")]);
    }

    #[test]
    fn test_strips_carriage_return() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, "9\t| |\r\n").unwrap();

        let records = store_at(&path).read_all().unwrap();
        assert_eq!(records[0].visual, "| |");
    }

    #[test]
    fn test_caps_record_count() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        let store = RecordStore::new(&path, 3, 2000);
        for i in 0..5 {
            store.append(&Record::new(i.to_string(), "|")).unwrap();
        }

        let records = store.read_all().unwrap();
        let codes: Vec<&str> = records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_skips_overlong_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, format!("1\t{}\n2\t||\n", "|".repeat(50))).unwrap();

        let records = RecordStore::new(&path, 200, 10).read_all().unwrap();
        assert_eq!(records, vec![Record::new("2", "||")]);
    }

    #[test]
    fn test_skips_unterminated_huge_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, format!("2\t||\n3\t{}", "|".repeat(1 << 20))).unwrap();

        let records = RecordStore::new(&path, 200, 10).read_all().unwrap();
        assert_eq!(records, vec![Record::new("2", "||")]);
    }

    #[test]
    fn test_bounded_line_read_caps_buffer() {
        let input = format!("{}\nnext\nlast", "x".repeat(10_000));
        let mut reader = Cursor::new(input.into_bytes());
        let mut buf = Vec::new();

        assert_eq!(read_line_bounded(&mut reader, &mut buf, 16).unwrap(), Some(true));
        assert!(buf.len() <= 16);
        assert_eq!(read_line_bounded(&mut reader, &mut buf, 16).unwrap(), Some(false));
        assert_eq!(buf, b"next");
        assert_eq!(read_line_bounded(&mut reader, &mut buf, 16).unwrap(), Some(false));
        assert_eq!(buf, b"last");
        assert_eq!(read_line_bounded(&mut reader, &mut buf, 16).unwrap(), None);
    }

    #[test]
    fn test_line_at_char_limit_with_multibyte_glyphs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        let visual = "█░".repeat(4);
        fs::write(&path, format!("1\t{visual}\r\n")).unwrap();

        let records = RecordStore::new(&path, 200, 10).read_all().unwrap();
        assert_eq!(records, vec![Record::new("1", visual)]);
    }

    #[test]
    fn test_append_mode_preserves_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        fs::write(&path, "1\t|\n").unwrap();

        store_at(&path).append(&Record::new("2", "||")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["1\t|", "2\t||"]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("dir").join("barcode.txt");
        store_at(&nested).append(&Record::new("1", "|")).unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_rejects_delimiters_in_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        let store = store_at(&path);

        assert!(matches!(
            store.append(&Record::new("1\t2", "|")),
            Err(StoreError::InvalidField { field: "code" })
        ));
        assert!(matches!(
            store.append(&Record::new("1", "|\n|")),
            Err(StoreError::InvalidField { field: "visual" })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_overlong_line_on_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("barcode.txt");
        let store = RecordStore::new(&path, 200, 8);

        assert!(matches!(
            store.append(&Record::new("1", "||||||||")),
            Err(StoreError::LineTooLong { len: 10, max: 8 })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_unreadable_store_is_io_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be read as a record file
        let store = store_at(dir.path());
        assert!(matches!(store.read_all(), Err(StoreError::Io { .. })));
    }
}
