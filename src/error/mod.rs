//! Error handling for the benchmark harness

use thiserror::Error;

/// Custom error types for the benchmark harness
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad command line arguments or configuration values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A client or server executable could not be started
    #[error("Process start failure: {0}")]
    ProcessStart(String),

    /// A client printed a line that is not a valid latency value
    #[error("Malformed sample: {0}")]
    MalformedSample(String),

    /// No latency samples were collected, so there is nothing to reduce
    #[error("Empty sample set: {0}")]
    EmptySampleSet(String),

    /// I/O errors while talking to child processes
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Create a new process start error
    pub fn process_start<S: Into<String>>(message: S) -> Self {
        Self::ProcessStart(message.into())
    }

    /// Create a new malformed sample error
    pub fn malformed_sample<S: Into<String>>(message: S) -> Self {
        Self::MalformedSample(message.into())
    }

    /// Create a new empty sample set error
    pub fn empty_sample_set<S: Into<String>>(message: S) -> Self {
        Self::EmptySampleSet(message.into())
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "CONFIG",
            Self::ProcessStart(_) => "SPAWN",
            Self::MalformedSample(_) => "SAMPLE",
            Self::EmptySampleSet(_) => "EMPTY",
            Self::Io(_) => "IO",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidConfig(msg) => {
                format!("Configuration problem: {}\n\nSuggestion: Check the command line arguments, your .env file and the BENCH_* environment variables.", msg)
            }
            Self::ProcessStart(msg) => {
                format!("Could not start a benchmark process: {}\n\nSuggestion: Make sure the client/server executables exist and are executable (see --client-bin and --server-bin).", msg)
            }
            Self::MalformedSample(msg) => {
                format!("A client produced unusable output: {}\n\nSuggestion: Clients must print exactly one non-negative decimal latency per line. The workload under test is likely broken.", msg)
            }
            Self::EmptySampleSet(msg) => {
                format!("No latency samples were collected: {}\n\nSuggestion: Run at least one client and check that the clients can reach the server.", msg)
            }
            Self::Io(msg) => {
                format!("I/O operation failed: {}\n\nSuggestion: Check system resource limits (open files, processes).", msg)
            }
            Self::Internal(msg) => {
                format!("Internal error: {}\n\nThis is likely a bug. Please report this issue with the error details.", msg)
            }
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidConfig(_) => 2,
            Self::ProcessStart(_) => 3,
            Self::MalformedSample(_) => 4,
            Self::EmptySampleSet(_) => 5,
            Self::Io(_) => 6,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::InvalidConfig(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::ProcessStart(_) | Self::Io(_) => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::MalformedSample(_) | Self::EmptySampleSet(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::invalid_config(format!("Environment file error: {}", error))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(error: std::num::ParseIntError) -> Self {
        Self::invalid_config(format!("Integer parse error: {}", error))
    }
}

impl From<std::num::ParseFloatError> for AppError {
    fn from(error: std::num::ParseFloatError) -> Self {
        Self::malformed_sample(format!("Float parse error: {}", error))
    }
}

impl From<std::str::ParseBoolError> for AppError {
    fn from(error: std::str::ParseBoolError) -> Self {
        Self::invalid_config(format!("Boolean parse error: {}", error))
    }
}

impl From<clap::Error> for AppError {
    fn from(error: clap::Error) -> Self {
        Self::invalid_config(error.to_string().trim_end().to_string())
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error context trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error, keeping its kind
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;

    /// Add static context to an error
    fn context(self, message: &'static str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<AppError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let context = f();
            match e.into() {
                AppError::InvalidConfig(msg) => AppError::InvalidConfig(format!("{}: {}", context, msg)),
                AppError::ProcessStart(msg) => AppError::ProcessStart(format!("{}: {}", context, msg)),
                AppError::MalformedSample(msg) => AppError::MalformedSample(format!("{}: {}", context, msg)),
                AppError::EmptySampleSet(msg) => AppError::EmptySampleSet(format!("{}: {}", context, msg)),
                AppError::Io(msg) => AppError::Io(format!("{}: {}", context, msg)),
                AppError::Internal(msg) => AppError::Internal(format!("{}: {}", context, msg)),
            }
        })
    }

    fn context(self, message: &'static str) -> Result<T> {
        self.with_context(|| message.to_string())
    }
}

/// Error reporter for user feedback on standard error
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render the diagnostic that `report_error` prints
    pub fn render(&self, error: &AppError) -> String {
        let mut rendered = error.format_for_console(self.use_color);
        if self.verbose {
            rendered.push_str("\n\n");
            rendered.push_str(&error.user_friendly_message());
        }
        rendered
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}
