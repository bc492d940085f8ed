use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::utils::get_utc_iso_datetime;

/// Centralized function to append an error report to a log file
///
/// # Arguments
/// * `log_path` - File the entry is appended to (created when missing)
/// * `error_type` - A description of the error type/category (e.g., "Cabinet Validation Error")
/// * `error_message` - The actual error message content
pub fn write_error_to_log(log_path: &Path, error_type: &str, error_message: &str) {
    let timestamp = get_utc_iso_datetime();
    let log_entry = format!("\n[{}] {}:\n{}\n", timestamp, error_type, error_message);

    match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(mut file) => {
            if let Err(e) = writeln!(file, "{}", log_entry) {
                tracing::warn!("Could not write to {}: {}", log_path.display(), e);
            }
        }
        Err(e) => tracing::warn!("Could not open {}: {}", log_path.display(), e),
    }
}
