use std::env;

use chrono::{DateTime, Utc};

use calexport::app::{ExportOutcome, run_export};
use calexport::calendar::{DateUnit, DateWindow, RangeError};
use calexport::report::ReportPrinter;
use calexport::source::LocalStore;
use calexport::storage::Config;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let options = match cli::parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {}", err);
            eprintln!("{}", cli::USAGE);
            std::process::exit(2);
        }
    };

    let config = Config::load_or_create()?;

    // Cleaning is a standalone pass over an existing export; it touches
    // neither the window nor the store.
    if options.clean {
        let export_path = options.output.unwrap_or(config.export.output_file);
        let printer = ReportPrinter::new(!options.no_color);
        match calexport::clean::clean(&export_path) {
            Ok(summary) => printer.print_clean_summary(&summary),
            Err(err) => {
                eprintln!("Clean failed: {}", err);
                tracing::error!("clean failed: {}", err);
            }
        }
        return Ok(());
    }

    let (past_amount, past_unit) = options
        .past
        .clone()
        .unwrap_or_else(|| (config.export.past_amount, config.export.past_unit.clone()));
    let (future_amount, future_unit) = options
        .future
        .clone()
        .unwrap_or_else(|| (config.export.future_amount, config.export.future_unit.clone()));

    // A bad unit or an overflowing shift aborts before any store access.
    let reference = Utc::now();
    let window = match compute_window(reference, past_amount, &past_unit, future_amount, &future_unit)
    {
        Ok(window) => window,
        Err(err) => {
            eprintln!("Error: {}", err);
            tracing::error!("range computation failed: {}", err);
            std::process::exit(2);
        }
    };

    let output = options.output.unwrap_or(config.export.output_file);
    let store_path = options.store.unwrap_or(config.store.path);
    let source = LocalStore::new(store_path);
    let printer = ReportPrinter::new(!options.no_color);

    if options.report {
        printer.print_window(&window, reference);
    }

    match run_export(&source, window, &output).await {
        Ok(ExportOutcome::Written(summary)) => printer.print_summary(&summary),
        Ok(ExportOutcome::AccessNotGranted) => printer.print_access_not_granted(),
        Err(err) => {
            eprintln!("Export failed: {}", err);
            tracing::error!("export failed: {}", err);
        }
    }

    Ok(())
}

fn compute_window(
    reference: DateTime<Utc>,
    past_amount: u32,
    past_unit: &str,
    future_amount: u32,
    future_unit: &str,
) -> Result<DateWindow, RangeError> {
    let past_unit: DateUnit = past_unit.parse()?;
    let future_unit: DateUnit = future_unit.parse()?;
    DateWindow::compute(reference, past_amount, past_unit, future_amount, future_unit)
}

fn setup_logging() {
    let log_dir = dirs::config_dir()
        .map(|d| d.join("calexport"))
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calexport.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("calexport started");
}
