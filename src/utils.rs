use cabinet_lib::utils::get_utc_iso_datetime;
use cabinet_lib::SheetErrors;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set up tracing to stderr so stdout stays clean for JSON output
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Format rejected sheets into a structured string for the error log
pub fn format_rejection_report(rejected: &[SheetErrors]) -> String {
    let mut report = String::new();

    report.push_str("=============================\n");
    report.push_str(&format!("Generated at: {}\n\n", get_utc_iso_datetime()));
    report.push_str(&format!("Total rejected sheets: {}\n\n", rejected.len()));

    for sheet in rejected {
        report.push_str(&format!(
            "Sheet '{}': {} error(s)\n",
            sheet.sheet,
            sheet.errors.len()
        ));
        for message in sheet.messages() {
            report.push_str(&format!("  - {}\n", message));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use cabinet_lib::SheetError;

    #[test]
    fn test_rejection_report_lists_every_message() {
        let rejected = vec![SheetErrors {
            sheet: "Cab2".to_string(),
            errors: vec![
                SheetError::RackNotNumeric { row: 2 },
                SheetError::InvalidUnit { row: 5 },
            ],
        }];

        let report = format_rejection_report(&rejected);

        assert!(report.contains("Total rejected sheets: 1"));
        assert!(report.contains("Sheet 'Cab2': 2 error(s)"));
        assert!(report.contains("  - Row 2: Rack must contain a numeric value"));
        assert!(report.contains("  - Row 5: U must be numeric or 'BLADE'"));
    }
}
