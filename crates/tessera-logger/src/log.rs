use crate::severity::LogSeverity;
use crate::systime::now;
use once_cell::sync::OnceCell;

static MIN_SEVERITY: OnceCell<LogSeverity> = OnceCell::new();

/// Installs the process-wide minimum severity. Only the first call has an effect; returns
/// whether this call installed it.
pub fn init(min_severity: LogSeverity) -> bool {
    MIN_SEVERITY.set(min_severity).is_ok()
}

/// Whether messages of this severity are currently printed. Defaults to Info and above.
pub fn enabled(severity: LogSeverity) -> bool {
    severity >= *MIN_SEVERITY.get().unwrap_or(&LogSeverity::Info)
}

pub fn log(msg: String, log_severity: LogSeverity) {
    if enabled(log_severity) {
        println!("{}", format_line(&msg, log_severity, &now()));
    }
}

fn format_line(msg: &str, log_severity: LogSeverity, timestamp: &str) -> String {
    format!("[{}] {} {}", log_severity, timestamp, msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        assert_eq!(
            format_line("chunk sent", LogSeverity::Debug, "2024-01-01 00:00:00 UTC"),
            "[DEBUG] 2024-01-01 00:00:00 UTC chunk sent"
        );
    }

    #[test]
    fn test_threshold() {
        init(LogSeverity::Warning);
        let min = *MIN_SEVERITY.get().unwrap();
        assert_eq!(enabled(LogSeverity::Fatal), true);
        assert_eq!(enabled(LogSeverity::Debug), LogSeverity::Debug >= min);
    }
}
