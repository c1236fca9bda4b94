use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::Value;

use crate::types::{FetchError, FetchResult};

/*
 * Write one successful envelope to {dir}/{FROM}_{TO}_{DATE}.json,
 * pretty-printed UTF-8 with extended characters left unescaped. The
 * directory is created on first use; querying the same triple again
 * overwrites the file.
 */
pub fn save_envelope(
    dir: &Path,
    from: &str,
    to: &str,
    date_str: &str,
    payload: &Value,
) -> FetchResult<PathBuf> {
    fs::create_dir_all(dir)
        .map_err(|e| FetchError::Io(format!("cannot create {}: {}", dir.display(), e)))?;
    let path = dir.join(format!("{}_{}_{}.json", from, to, date_str));
    let pretty = serde_json::to_string_pretty(payload)
        .map_err(|e| FetchError::Io(format!("cannot serialize payload: {}", e)))?;
    fs::write(&path, pretty)
        .map_err(|e| FetchError::Io(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(path)
}

/*
 * Append-only event log shared by every query in the process: one line
 * per event, "TIMESTAMP [LEVEL] message", echoed to stderr. Constructed
 * once in main and owned by the orchestrator; flush runs on drop as well
 * so shutdown never loses lines.
 */
pub struct Logger {
    file: File,
}

impl Logger {
    pub fn open(path: &Path) -> FetchResult<Logger> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| FetchError::Io(format!("cannot open log file {}: {}", path.display(), e)))?;
        Ok(Logger { file })
    }

    pub fn info(&mut self, message: &str) {
        self.write("INFO", message);
    }

    pub fn error(&mut self, message: &str) {
        self.write("ERROR", message);
    }

    fn write(&mut self, level: &str, message: &str) {
        let line = format!(
            "{} [{}] {}",
            Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            level,
            message
        );
        eprintln!("{}", line);
        //a log-file write failure must not become a query failure
        let _ = writeln!(self.file, "{}", line);
    }

    pub fn flush(&mut self) {
        let _ = self.file.flush();
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_envelope_creates_dir_and_pretty_prints() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let out_dir = scratch.path().join("data");
        let payload = json!({
            "error": "",
            "data": {"from": "USD", "to": "EUR", "rate": 1.08, "date": "2025-06-01"}
        });

        let path = save_envelope(&out_dir, "USD", "EUR", "2025-06-01", &payload).unwrap();
        assert!(path.ends_with("USD_EUR_2025-06-01.json"));

        let text = fs::read_to_string(&path).unwrap();
        //pretty printing spreads the envelope over multiple lines
        assert!(text.lines().count() > 1);
        let reread: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(reread, payload);
    }

    #[test]
    fn test_save_envelope_keeps_non_ascii_unescaped() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let payload = json!({"error": "", "data": {"note": "naïve — 1 € ≈ 1.08 $"}});

        let path = save_envelope(scratch.path(), "USD", "EUR", "2025-06-01", &payload).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("naïve — 1 € ≈ 1.08 $"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_save_envelope_overwrites_same_triple() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let first = json!({"error": "", "data": {"rate": 1.0}});
        let second = json!({"error": "", "data": {"rate": 2.0}});

        save_envelope(scratch.path(), "USD", "EUR", "2025-06-01", &first).unwrap();
        let path = save_envelope(scratch.path(), "USD", "EUR", "2025-06-01", &second).unwrap();

        let reread: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reread, second);
    }

    #[test]
    fn test_logger_lines_carry_timestamp_and_level() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let log_path = scratch.path().join("error.log");

        let mut log = Logger::open(&log_path).unwrap();
        log.error("boom");
        log.info("saved one");
        log.flush();

        let text = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("[ERROR] boom"));
        assert!(lines[1].ends_with("[INFO] saved one"));
        //timestamp prefix: "YYYY-MM-DD HH:MM:SS.mmm"
        assert_eq!(&lines[0][4..5], "-");
        assert_eq!(&lines[0][10..11], " ");
    }

    #[test]
    fn test_logger_appends_across_reopens() {
        let scratch = tempfile::tempdir().expect("tempdir");
        let log_path = scratch.path().join("error.log");

        {
            let mut log = Logger::open(&log_path).unwrap();
            log.error("first run");
        }
        {
            let mut log = Logger::open(&log_path).unwrap();
            log.error("second run");
        }

        let text = fs::read_to_string(&log_path).unwrap();
        assert!(text.contains("first run"));
        assert!(text.contains("second run"));
        assert_eq!(text.lines().count(), 2);
    }
}
