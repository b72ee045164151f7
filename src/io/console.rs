//! Interactive console menu
//!
//! Two modes: generate a barcode and append it to the store, or list the
//! stored codes and decode one by its 1-based number. Every handled path
//! returns `Ok`; only console I/O failures are errors.

use crate::domain::{CodecError, Record};
use crate::services::{Session, SessionError};
use std::io::{self, BufRead, Write};

/// Run one round of the menu
pub fn run_menu<R: BufRead, W: Write>(session: &Session, input: &mut R, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Barcode Reader and Generator (Multiple Saved) ===")?;
    writeln!(out, "1) Generate barcode and APPEND to file")?;
    writeln!(out, "2) Read barcode list from file and choose one to decode")?;

    match prompt(input, out, "Choose (1 or 2): ")?.as_deref() {
        Some("1") => generate(session, input, out),
        Some("2") => decode(session, input, out),
        _ => writeln!(out, "Invalid choice."),
    }
}

fn generate<R: BufRead, W: Write>(session: &Session, input: &mut R, out: &mut W) -> io::Result<()> {
    let code = prompt(input, out, "Enter product code (digits only): ")?.unwrap_or_default();

    let visual = match session.render(&code) {
        Ok(visual) => visual,
        Err(CodecError::InvalidDigit { .. }) => {
            return writeln!(out, "Error: code must contain only digits!");
        }
        Err(e) => return writeln!(out, "Error: {e}"),
    };

    writeln!(out, "\nGenerated barcode (visual):\n{visual}")?;

    let record = Record::new(code, visual.into_string());
    let path = session.store().path().display();
    match session.save(&record) {
        Ok(()) => writeln!(out, "\nAppended to {path} (new record added)"),
        Err(e) => writeln!(out, "\nError saving file: {e}"),
    }
}

fn decode<R: BufRead, W: Write>(session: &Session, input: &mut R, out: &mut W) -> io::Result<()> {
    let path = session.store().path().display();
    let records = match session.list() {
        Ok(records) if !records.is_empty() => records,
        Ok(_) => return writeln!(out, "No records found in {path}"),
        Err(e) => return writeln!(out, "Cannot read {path}: {e}"),
    };

    writeln!(out, "\nSaved barcodes in file:")?;
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{}) Code: {}", i + 1, record.code)?;
    }

    let text = format!("\nChoose number to decode (1-{}): ", records.len());
    let selection = match prompt(input, out, &text)?.and_then(|s| s.parse::<usize>().ok()) {
        Some(selection) => selection,
        None => return writeln!(out, "Invalid choice."),
    };

    let decoded = match session.decode_selection(selection) {
        Ok(decoded) => decoded,
        Err(SessionError::SelectionOutOfRange { .. }) => return writeln!(out, "Invalid choice."),
        Err(e) => return writeln!(out, "Error: {e}"),
    };

    writeln!(out, "\nChosen record:")?;
    writeln!(out, "Stored code: {}", decoded.record.code)?;
    writeln!(out, "Visual barcode:\n{}", decoded.record.visual)?;

    match &decoded.decoded {
        Ok(code) => {
            writeln!(out, "\nDecoded product code: {code}")?;
            if !decoded.matches_stored_code() {
                writeln!(out, "Warning: decoded code differs from stored code")?;
            }
            Ok(())
        }
        Err(e @ CodecError::InvalidGlyph { .. }) => {
            writeln!(out, "Error: barcode contains invalid characters ({e}).")
        }
        Err(e) => writeln!(out, "\nError: cannot decode barcode ({e})."),
    }
}

/// Print `text`, then read one trimmed line; `None` at end of input
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Config;
    use std::fs;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run(session: &Session, input: &str) -> String {
        let mut out = Vec::new();
        run_menu(session, &mut Cursor::new(input.as_bytes()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn session_in(dir: &std::path::Path) -> Session {
        Session::from_config(&Config::default().with_store_path(dir.join("barcode.txt")))
    }

    #[test]
    fn test_generate_flow() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        let output = run(&session, "1\n07\n");
        assert!(output.contains("Generated barcode (visual):\n| | |  ||    ||| | |\n"));
        assert!(output.contains("new record added"));
        assert_eq!(session.list().unwrap().len(), 1);
    }

    #[test]
    fn test_generate_rejects_non_digits() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());

        let output = run(&session, "1\n12ab\n");
        assert!(output.contains("Error: code must contain only digits!"));
        assert!(!session.store().path().exists());
    }

    #[test]
    fn test_decode_flow() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.generate("314").unwrap();
        session.generate("2718").unwrap();

        let output = run(&session, "2\n2\n");
        assert!(output.contains("1) Code: 314\n"));
        assert!(output.contains("2) Code: 2718\n"));
        assert!(output.contains("Stored code: 2718"));
        assert!(output.contains("Decoded product code: 2718"));
        assert!(!output.contains("Warning"));
    }

    #[test]
    fn test_decode_out_of_range() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        session.generate("1").unwrap();

        assert!(run(&session, "2\n5\n").ends_with("Invalid choice.\n"));
        assert!(run(&session, "2\nabc\n").ends_with("Invalid choice.\n"));
    }

    #[test]
    fn test_decode_empty_store() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        assert!(run(&session, "2\n").contains("No records found"));
    }

    #[test]
    fn test_decode_invalid_glyphs() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        fs::write(session.store().path(), "1\t|?|\n").unwrap();

        let output = run(&session, "2\n1\n");
        assert!(output.contains("Error: barcode contains invalid characters"));
    }

    #[test]
    fn test_decode_wrong_format() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        fs::write(session.store().path(), "1\t||||||||||||\n").unwrap();

        let output = run(&session, "2\n1\n");
        assert!(output.contains("cannot decode barcode"));
    }

    #[test]
    fn test_invalid_choice() {
        let dir = tempdir().unwrap();
        let session = session_in(dir.path());
        assert!(run(&session, "3\n").ends_with("Invalid choice.\n"));
        assert!(run(&session, "").ends_with("Invalid choice.\n"));
    }
}
