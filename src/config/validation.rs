//! Non-fatal configuration checks

use crate::{
    error::Result,
    models::RunConfig,
};
use std::path::Path;

/// Clients per CPU above which the machine is considered oversubscribed
const CLIENTS_PER_CPU_WARNING: usize = 16;

/// Configuration validator producing warnings on top of `RunConfig::validate`
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, returning warnings for suspicious settings
    pub fn validate_comprehensive(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_client_count(config.num_clients, num_cpus::get()));
        warnings.extend(Self::validate_programs(config));
        warnings.extend(Self::validate_grace(config));
        Ok(warnings)
    }

    fn validate_client_count(num_clients: usize, cpus: usize) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if num_clients == 0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "No clients requested; the run cannot produce any samples".to_string(),
            ));
        } else if num_clients > cpus.max(1) * CLIENTS_PER_CPU_WARNING {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "{} clients on {} CPU(s) will oversubscribe this machine and inflate latencies",
                    num_clients, cpus
                ),
            ));
        }

        warnings
    }

    fn validate_programs(config: &RunConfig) -> Vec<ValidationWarning> {
        let mut programs = vec![("client", config.client_program.as_path())];
        if config.mode.manages_server() {
            programs.push(("server", config.server_program.as_path()));
        }

        programs
            .into_iter()
            .filter(|(_, path)| is_explicit_path(path) && !path.exists())
            .map(|(role, path)| {
                ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("{} executable '{}' does not exist", role, path.display()),
                )
            })
            .collect()
    }

    fn validate_grace(config: &RunConfig) -> Vec<ValidationWarning> {
        if !config.mode.manages_server() {
            return Vec::new();
        }

        if config.startup_grace_ms == 0 {
            vec![ValidationWarning::new(
                ValidationLevel::Warning,
                "Startup grace period is 0ms; clients may start before the server is listening".to_string(),
            )]
        } else if config.startup_grace_ms > 10_000 {
            vec![ValidationWarning::new(
                ValidationLevel::Info,
                format!("Startup grace period of {}ms delays every run", config.startup_grace_ms),
            )]
        } else {
            Vec::new()
        }
    }
}

/// Bare program names are looked up on PATH by the OS, so only paths with a
/// directory component can be checked up front.
fn is_explicit_path(path: &Path) -> bool {
    path.components().count() > 1 || path.is_absolute()
}

/// Severity of a validation message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Validation warning with severity level
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let level = match self.level {
                ValidationLevel::Info => self.level.as_str().blue(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", level, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
