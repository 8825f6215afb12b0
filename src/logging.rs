//! Structured logging for the benchmark harness
//!
//! This module provides:
//! - Leveled logging with a builder API for structured fields
//! - Console and JSON output formats
//! - A per-run session id attached to every entry
//! - `RunLogger`, which knows the events of a benchmark run
//!
//! Every entry is written to standard error. Standard output is reserved for
//! the benchmark report.

use crate::error::{AppError, Result};
use crate::models::{RunConfig, RunResult};
use crate::process::ClientOutput;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",
            LogLevel::Info => "\x1b[32m",
            LogLevel::Warn => "\x1b[33m",
            LogLevel::Error => "\x1b[31m",
        }
    }

    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Additional structured fields, ordered for stable output
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Shared logging context
#[derive(Debug, Default)]
struct LogContext {
    session_id: Option<String>,
    context_fields: BTreeMap<String, serde_json::Value>,
}

/// Logger implementation with console and JSON output
#[derive(Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a logger whose verbosity follows the run configuration
    pub fn with_config(name: String, config: &RunConfig) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set session correlation ID
    pub async fn set_session_id(&self, session_id: String) {
        let mut context = self.context.write().await;
        context.session_id = Some(session_id);
    }

    /// Add context field for all subsequent log entries
    pub async fn add_context_field<T: Serialize>(&self, key: String, value: T) {
        if let Ok(json_value) = serde_json::to_value(value) {
            let mut context = self.context.write().await;
            context.context_fields.insert(key, json_value);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    async fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        let context = self.context.read().await;
        if let Some(session_id) = &context.session_id {
            entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
        }
        for (key, value) in &context.context_fields {
            entry.fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        drop(context);

        let output = self.format_entry(&entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in this logger's format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}", timestamp, formatted_level, entry.logger, entry.message);

        // Session id is noise on the console
        let fields: Vec<String> = entry
            .fields
            .iter()
            .filter(|(k, _)| k.as_str() != "session_id")
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        if !fields.is_empty() {
            output.push_str(&format!(" {{{}}}", fields.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": {:?}}}", entry.message),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add error information
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_exit_code", error.exit_code())
    }

    /// Take the entry without writing it
    pub fn build(self) -> LogEntry {
        self.entry
    }

    /// Finalize and write the log entry
    pub async fn log(self) {
        let logger = self.logger;
        logger.write_entry(self.build()).await;
    }
}

/// Logger for the lifecycle events of one benchmark run
#[derive(Clone)]
pub struct RunLogger {
    logger: Logger,
}

impl RunLogger {
    /// Create a run logger with a fresh session id
    pub async fn new(config: &RunConfig) -> Self {
        let logger = Logger::with_config("RUN".to_string(), config);
        logger.set_session_id(Uuid::new_v4().to_string()).await;
        logger.add_context_field("mode".to_string(), config.mode.as_str()).await;
        Self { logger }
    }

    /// A run logger that prints nothing below `Error`
    #[cfg(test)]
    pub fn quiet() -> Self {
        let logger = Logger {
            min_level: LogLevel::Error,
            use_color: false,
            format: LogFormat::Console,
            name: "RUN".to_string(),
            context: Arc::new(RwLock::new(LogContext::default())),
        };
        Self { logger }
    }

    pub async fn log_run_started(&self, config: &RunConfig) {
        self.logger.info(&format!("Starting benchmark run with {} client(s) against {}", config.num_clients, config.address))
            .field("num_clients", config.num_clients)
            .field("address", &config.address)
            .field("client_program", config.client_program.display().to_string())
            .log()
            .await;
    }

    pub async fn log_server_spawned(&self, pid: Option<u32>, config: &RunConfig) {
        self.logger.info(&format!("Started server {}", config.server_program.display()))
            .field("pid", pid)
            .field("grace_ms", config.startup_grace_ms)
            .log()
            .await;
    }

    pub async fn log_client_spawned(&self, index: usize, pid: Option<u32>) {
        self.logger.debug(&format!("Spawned client {}", index))
            .field("client", index)
            .field("pid", pid)
            .log()
            .await;
    }

    pub async fn log_client_completed(&self, index: usize, output: &ClientOutput) {
        let level = if output.success { LogLevel::Debug } else { LogLevel::Warn };
        let message = if output.success {
            format!("Client {} finished with {} line(s)", index, output.lines.len())
        } else {
            format!(
                "Client {} exited abnormally ({}); keeping its {} line(s) of output",
                index,
                output.describe_exit(),
                output.lines.len()
            )
        };

        self.logger.log(level, &message)
            .field("client", index)
            .field("pid", output.pid)
            .field("exit_code", output.exit_code)
            .field("lines", output.lines.len())
            .log()
            .await;
    }

    pub async fn log_server_terminated(&self, pid: Option<u32>, outcome: &Result<()>) {
        match outcome {
            Ok(()) => {
                self.logger.info("Terminated server")
                    .field("pid", pid)
                    .log()
                    .await;
            }
            Err(error) => {
                self.logger.log(LogLevel::Error, &format!("Failed to terminate server: {}", error))
                    .field("pid", pid)
                    .error_info(error)
                    .log()
                    .await;
            }
        }
    }

    pub async fn log_run_finished(&self, result: &RunResult, elapsed: Duration) {
        self.logger.info(&format!(
            "Collected {} sample(s) from {} client(s) in {:.3}s",
            result.sample_count,
            result.client_count,
            elapsed.as_secs_f64()
        ))
            .field("samples", result.sample_count)
            .field("clients", result.client_count)
            .field("mean", result.mean)
            .field("deviation", result.std_dev)
            .field("elapsed_ms", elapsed.as_secs_f64() * 1000.0)
            .log()
            .await;
    }

    /// The user-facing diagnostic is printed by the binary, so this only
    /// shows up in verbose and debug runs
    pub async fn log_run_failed(&self, error: &AppError) {
        self.logger.info(&format!("Benchmark run aborted: {}", error))
            .error_info(error)
            .log()
            .await;
    }
}
