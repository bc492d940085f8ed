// reset; cargo run -- process ./data/racks.xlsx --pretty
// reset; cargo run -- serve --port 8080 --allowed-origin http://localhost:3000

use cabinet_lib::{process_file_report, utils::write_error_to_log};
use clap::{Parser, Subcommand};
use rack_importer::{
    server::{serve, ServeArgs},
    utils::{format_rejection_report, init_tracing},
    ERRORS_LOG_FILE,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rack-importer")]
#[command(about = "Validate rack inventory workbooks and return the cabinets as JSON")]
#[command(version)]
struct Args {
    /// Default log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process a workbook from disk and print the JSON response
    Process {
        /// Path to the workbook (xlsx, xlsm, xlsb, xls or ods)
        file: PathBuf,

        /// Print accepted cabinets and rejected sheets together
        #[arg(long)]
        full: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Append rejected sheets to an error log (defaults to errors.log)
        #[arg(long, num_args = 0..=1, default_missing_value = ERRORS_LOG_FILE)]
        error_log: Option<PathBuf>,
    },

    /// Run the HTTP upload endpoint
    Serve(ServeArgs),
}

fn main() -> anyhow::Result<()> {
    let arguments = Args::parse();
    init_tracing(&arguments.log_level);

    match arguments.command {
        Command::Process {
            file,
            full,
            pretty,
            error_log,
        } => run_process(&file, full, pretty, error_log),
        Command::Serve(serve_args) => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(&serve_args))
        }
    }
}

fn run_process(
    file: &Path,
    full: bool,
    pretty: bool,
    error_log: Option<PathBuf>,
) -> anyhow::Result<()> {
    let report = match process_file_report(file) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("❌ Processing failed with error: {e}");
            std::process::exit(2);
        }
    };

    if let Some(log_path) = &error_log {
        if !report.errors.is_empty() {
            write_error_to_log(
                log_path,
                "Cabinet Validation Error Report",
                &format_rejection_report(&report.errors),
            );
        }
    }

    let rejected_sheets = report.errors.len();
    let (json, rejected) = if full {
        let response = report.into_full_response();
        (to_json(&response, pretty)?, response.is_rejected())
    } else {
        let response = report.into_response();
        (to_json(&response, pretty)?, response.is_rejected())
    };

    println!("{json}");

    if rejected {
        eprintln!("❌ Validation failed: no cabinet sheet was accepted");
        if let Some(log_path) = &error_log {
            eprintln!("❌ Check {} for details.", log_path.display());
        }
        std::process::exit(1);
    }
    if rejected_sheets > 0 {
        eprintln!("⚠️ {rejected_sheets} sheet(s) rejected and left out");
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
