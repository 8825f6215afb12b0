//! Main application orchestration and execution

use crate::{
    config::{display_config_summary, validate_config, ConfigParser, ValidationWarning},
    error::{AppError, ErrorReporter, Result},
    executor::{RunController, RunOutcome},
    logging::RunLogger,
    models::RunConfig,
    output::{render_summary, ReportEmitter},
    process::OsProcessSpawner,
};

/// One invocation of a harness binary
pub struct App {
    config: RunConfig,
    warnings: Vec<ValidationWarning>,
}

impl App {
    /// Build the run configuration from parsed arguments
    pub fn new(parser: ConfigParser) -> Result<Self> {
        let config = parser.parse()?;
        let warnings = validate_config(&config)?;
        Ok(Self { config, warnings })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Error reporter following the resolved color and verbosity settings
    pub fn error_reporter(&self) -> ErrorReporter {
        ErrorReporter::new(self.config.enable_color, self.config.verbose)
    }

    /// Run the benchmark and write the report to standard output
    pub async fn run(self) -> Result<RunOutcome> {
        let config = &self.config;

        if config.debug {
            eprintln!("{}", build_banner());
            eprintln!("{}", display_config_summary(config));
        }

        for warning in &self.warnings {
            eprintln!("{}", warning.format(config.enable_color));
        }

        let logger = RunLogger::new(config).await;
        let controller = RunController::new(OsProcessSpawner::new(), logger);
        let outcome = controller.run(config).await?;

        ReportEmitter::from_config(config).emit_stdout(&outcome.result)?;

        if config.verbose {
            eprintln!("{}", render_summary(config, &outcome.result, outcome.elapsed, config.enable_color));
        }

        Ok(outcome)
    }
}

/// Name, version and build stamp of this binary
pub fn build_banner() -> String {
    format!(
        "{} v{} ({}, {}, built {})",
        crate::PKG_NAME,
        crate::VERSION,
        crate::GIT_COMMIT,
        crate::TARGET_TRIPLE,
        crate::BUILD_TIME
    )
}

/// Run a harness binary to completion and return its exit code.
///
/// `use_color` and `verbose` only shape errors raised while the
/// configuration is still being built; later errors follow the config.
pub async fn execute(parser: ConfigParser, use_color: bool, verbose: bool) -> i32 {
    let app = match App::new(parser) {
        Ok(app) => app,
        Err(e) => {
            ErrorReporter::new(use_color, verbose).report_error(&e);
            return e.exit_code();
        }
    };

    let reporter = app.error_reporter();
    match app.run().await {
        Ok(_) => 0,
        Err(e) => {
            reporter.report_error(&e);
            e.exit_code()
        }
    }
}

/// Turn a clap parse failure into an exit code.
///
/// Help and version requests print to stdout and succeed; real usage errors
/// are configuration errors.
pub fn handle_parse_error(error: clap::Error) -> i32 {
    let _ = error.print();
    if !error.use_stderr() {
        return 0;
    }
    AppError::from(error).exit_code()
}

/// Report panics on stderr with a distinct exit code
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        std::process::exit(AppError::internal("panic").exit_code());
    }));
}
