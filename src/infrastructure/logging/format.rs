//! Rendering of records into file and console lines.

use console::Style;

use crate::domain::models::{Record, Severity};

/// `"{SEVERITY} {message}"` with trailing newlines removed.
pub fn context(record: &Record) -> String {
    let mut text = format!("{} {}", record.severity, record.message);
    let trimmed = text.trim_end_matches('\n').len();
    text.truncate(trimmed);
    text
}

/// Line written to the log file:
/// `2026/10/19 10:22:33.123456 main.rs:42: INFO message`.
pub fn file_line(record: &Record) -> String {
    format!(
        "{} {}:{}: {}",
        record.timestamp.format("%Y/%m/%d %H:%M:%S%.6f"),
        record.short_file(),
        record.line,
        context(record)
    )
}

/// Uncolored console line:
/// `==>[2026/10/19_10:22:33.123456] @prefix #main.rs:42 INFO message`.
pub fn console_text(record: &Record, prefix: &str) -> String {
    let stamp = record.timestamp.format("%Y/%m/%d_%H:%M:%S%.6f");
    if prefix.is_empty() {
        format!(
            "==>[{stamp}] #{}:{} {}",
            record.short_file(),
            record.line,
            context(record)
        )
    } else {
        format!(
            "==>[{stamp}] @{prefix} #{}:{} {}",
            record.short_file(),
            record.line,
            context(record)
        )
    }
}

/// Terminal style for a severity. Styling is forced so the output does not
/// depend on whether stderr is a TTY.
pub fn console_style(severity: Severity) -> Style {
    let style = Style::new().force_styling(true);
    match severity {
        Severity::Warn => style.yellow(),
        Severity::Error => style.red().bold(),
        Severity::Fatal => style.magenta().bold(),
        Severity::All | Severity::Debug | Severity::Info => style,
    }
}

/// Colored console line.
pub fn console_line(record: &Record, prefix: &str) -> String {
    console_style(record.severity)
        .apply_to(console_text(record, prefix))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn record(severity: Severity, message: &str) -> Record {
        let at = Local.with_ymd_and_hms(2026, 10, 19, 7, 8, 9).unwrap()
            + chrono::Duration::microseconds(42);
        Record::new(severity, message.to_string(), "src/jobs/import.rs", 88, at)
    }

    #[test]
    fn test_context_trims_trailing_newlines() {
        assert_eq!(context(&record(Severity::Info, "done\n\n")), "INFO done");
        assert_eq!(context(&record(Severity::Warn, "a\nb")), "WARN a\nb");
    }

    #[test]
    fn test_file_line_layout() {
        assert_eq!(
            file_line(&record(Severity::Error, "disk full")),
            "2026/10/19 07:08:09.000042 import.rs:88: ERROR disk full"
        );
    }

    #[test]
    fn test_console_text_with_and_without_prefix() {
        assert_eq!(
            console_text(&record(Severity::Debug, "x"), ""),
            "==>[2026/10/19_07:08:09.000042] #import.rs:88 DEBUG x"
        );
        assert_eq!(
            console_text(&record(Severity::Debug, "x"), "gate-1"),
            "==>[2026/10/19_07:08:09.000042] @gate-1 #import.rs:88 DEBUG x"
        );
    }

    #[test]
    fn test_console_colors_by_severity() {
        for severity in [Severity::Debug, Severity::Info] {
            let rec = record(severity, "plain");
            assert_eq!(console_line(&rec, ""), console_text(&rec, ""));
        }

        for severity in [Severity::Warn, Severity::Error, Severity::Fatal] {
            let rec = record(severity, "colored");
            let line = console_line(&rec, "");
            assert_ne!(line, console_text(&rec, ""));
            assert_eq!(console::strip_ansi_codes(&line), console_text(&rec, ""));
        }

        let warn = console_line(&record(Severity::Warn, "w"), "");
        assert!(warn.starts_with("\u{1b}[33m"));
        let error = console_line(&record(Severity::Error, "e"), "");
        assert!(error.contains("\u{1b}[31m") && error.contains("\u{1b}[1m"));
        let fatal = console_line(&record(Severity::Fatal, "f"), "");
        assert!(fatal.contains("\u{1b}[35m") && fatal.contains("\u{1b}[1m"));
    }
}
