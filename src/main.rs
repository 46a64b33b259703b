/*!
 * Command-line interface for filizer
 */

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::{debug, error, warn};

use filizer::config::{Args, Config};
use filizer::error::FilizerError;
use filizer::inventory::{version_at_least, HttpInventory};
use filizer::logging::init_logger;
use filizer::marker::{Confirmation, FixedConfirmation, MarkerStore, TerminalConfirmation};
use filizer::report::{Reporter, RunReport};
use filizer::scanner::Scanner;
use filizer::utils::count_files;

/// Exit code for configuration errors detected before the walk
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        generate(shell, &mut Args::command(), "filizer", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    // Hidden until the walk starts so startup errors print without a bar
    let progress = ProgressBar::hidden();
    init_logger(args.verbose, progress.clone());

    // Configuration problems stop the run before anything is touched
    let config = match Config::load(args) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return exit_code(&e);
        }
    };

    let inventory = match config.endpoint().and_then(|url| {
        HttpInventory::new(url, config.token.clone(), config.timeout)
            .map_err(|e| FilizerError::Config(format!("Failed to set up inventory client: {}", e)))
    }) {
        Ok(inventory) => inventory,
        Err(e) => {
            error!("{}", e);
            return exit_code(&e);
        }
    };

    check_server_version(&inventory);

    progress.set_length(count_files(&config.scan_root, &config.excludes));
    progress.set_draw_target(ProgressDrawTarget::stderr());
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} {pos}/{len} ({percent}%) Elapsed: {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("Scanning");

    let confirmation: Box<dyn Confirmation> = if config.force {
        Box::new(FixedConfirmation::AlwaysConfirm)
    } else {
        Box::new(TerminalConfirmation::new(progress.clone()))
    };
    let markers = MarkerStore::new(confirmation, config.dry_run);
    let reporter = Reporter::new(config.report_format);
    let dry_run = config.dry_run;

    let mut scanner = Scanner::new(config, inventory, markers, Arc::new(progress.clone()));
    let result = scanner.run();
    progress.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("Scan failed: {}", e);
            RunReport::aborted(dry_run)
        }
    };

    reporter.log_report(&report);

    if report.summary.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Fatal errors exit with the configuration code, everything else with 1
fn exit_code(e: &FilizerError) -> ExitCode {
    if e.is_fatal() {
        ExitCode::from(EXIT_CONFIG)
    } else {
        ExitCode::FAILURE
    }
}

/// Warn when the server no longer supports this client version
fn check_server_version(inventory: &HttpInventory) {
    match inventory.server_version() {
        Ok(info) => {
            debug!("Inventory server version {}", info.version);
            if !version_at_least(filizer::VERSION, &info.min_client_version) {
                warn!(
                    "Client version {} is older than the server's minimum {}",
                    filizer::VERSION,
                    info.min_client_version
                );
            }
        }
        Err(e) => debug!(
            "Could not read server version from {}: {}",
            inventory.files_url(),
            e
        ),
    }
}
