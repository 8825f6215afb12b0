//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{Cli, DisplayArgs, SelfContainedCli},
    config::env::EnvManager,
    defaults,
    error::Result,
    models::RunConfig,
};

/// Which binary's arguments a configuration is built from
#[derive(Debug, Clone)]
pub enum CliSource {
    External(Cli),
    SelfContained(SelfContainedCli),
}

impl CliSource {
    fn display(&self) -> &DisplayArgs {
        match self {
            CliSource::External(cli) => &cli.display,
            CliSource::SelfContained(cli) => &cli.display,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            CliSource::External(cli) => cli.validate(),
            CliSource::SelfContained(cli) => cli.validate(),
        }
    }
}

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    source: CliSource,
}

impl ConfigParser {
    pub fn new(source: CliSource) -> Self {
        Self { source }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<RunConfig> {
        // Load from environment file if it exists
        EnvManager::load_env_file(self.source.display().debug)?;

        self.build_with_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration reading variables through `lookup` instead
    /// of the process environment
    pub fn build_with_lookup<F>(&self, lookup: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.source.validate()?;

        let mut config = self.defaults();
        config.merge_from_lookup(lookup)?;
        self.apply_cli_overrides(&mut config);
        config.validate()?;

        Ok(config)
    }

    fn defaults(&self) -> RunConfig {
        match &self.source {
            CliSource::External(cli) => RunConfig::external(cli.num_clients, cli.server_name.trim()),
            CliSource::SelfContained(_) => RunConfig::self_contained(
                defaults::DEFAULT_SELF_CONTAINED_CLIENTS,
                defaults::DEFAULT_SELF_CONTAINED_ADDRESS,
            ),
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut RunConfig) {
        match &self.source {
            CliSource::External(cli) => {
                if let Some(client_bin) = &cli.client_bin {
                    config.client_program = client_bin.clone();
                }
            }
            CliSource::SelfContained(cli) => {
                if let Some(clients) = cli.clients {
                    config.num_clients = clients;
                }
                if let Some(address) = &cli.address {
                    config.address = address.trim().to_string();
                }
                if let Some(client_bin) = &cli.client_bin {
                    config.client_program = client_bin.clone();
                }
                if let Some(server_bin) = &cli.server_bin {
                    config.server_program = server_bin.clone();
                }
                if let Some(grace_ms) = cli.grace_ms {
                    config.startup_grace_ms = grace_ms;
                }
            }
        }

        self.source.display().apply(config);
    }
}

/// Display configuration summary
pub fn display_config_summary(config: &RunConfig) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("Mode: {}\n", config.mode.as_str()));
    summary.push_str(&format!("Clients: {}\n", config.num_clients));
    summary.push_str(&format!("Address: {}\n", config.address));
    summary.push_str(&format!("Client executable: {}\n", config.client_program.display()));
    if config.mode.manages_server() {
        summary.push_str(&format!("Server executable: {}\n", config.server_program.display()));
        summary.push_str(&format!("Startup grace: {}ms\n", config.startup_grace_ms));
    }
    summary.push_str(&format!("Output format: {:?}\n", config.output_format));
    summary.push_str(&format!("Color output: {}\n", config.enable_color));
    summary.push_str(&format!("Verbose: {}\n", config.verbose));
    summary.push_str(&format!("Debug: {}", config.debug));

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::RunMode;
    use crate::output::OutputFormat;
    use clap::Parser;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    fn external(args: &[&str]) -> ConfigParser {
        let argv = std::iter::once("run-benchmark").chain(args.iter().copied());
        ConfigParser::new(CliSource::External(Cli::try_parse_from(argv).unwrap()))
    }

    fn self_contained(args: &[&str]) -> ConfigParser {
        let argv = std::iter::once("run-benchmark-selfcontained").chain(args.iter().copied());
        ConfigParser::new(CliSource::SelfContained(SelfContainedCli::try_parse_from(argv).unwrap()))
    }

    #[test]
    fn test_external_positionals() {
        let config = external(&["3", "bench-host", "--no-color"]).build_with_lookup(no_env).unwrap();
        assert_eq!(config.mode, RunMode::External);
        assert_eq!(config.num_clients, 3);
        assert_eq!(config.address, "bench-host");
        assert_eq!(config.client_program, PathBuf::from(defaults::DEFAULT_CLIENT_PROGRAM));
        assert!(!config.enable_color);
    }

    #[test]
    fn test_self_contained_defaults() {
        let config = self_contained(&[]).build_with_lookup(no_env).unwrap();
        assert_eq!(config.mode, RunMode::SelfContained);
        assert_eq!(config.num_clients, 50);
        assert_eq!(config.address, "localhost");
        assert_eq!(config.server_program, PathBuf::from(defaults::DEFAULT_SERVER_PROGRAM));
        assert_eq!(config.startup_grace_ms, 100);
    }

    #[test]
    fn test_env_overrides_defaults() {
        let config = self_contained(&[])
            .build_with_lookup(env_from(&[
                ("BENCH_NUM_CLIENTS", "7"),
                ("BENCH_SERVER_BIN", "/opt/server"),
            ]))
            .unwrap();
        assert_eq!(config.num_clients, 7);
        assert_eq!(config.server_program, PathBuf::from("/opt/server"));
    }

    #[test]
    fn test_cli_overrides_env() {
        let config = self_contained(&["--clients", "2", "--grace-ms", "0", "--client-bin", "/cli/client"])
            .build_with_lookup(env_from(&[
                ("BENCH_NUM_CLIENTS", "7"),
                ("BENCH_GRACE_MS", "500"),
                ("BENCH_CLIENT_BIN", "/env/client"),
            ]))
            .unwrap();
        assert_eq!(config.num_clients, 2);
        assert_eq!(config.startup_grace_ms, 0);
        assert_eq!(config.client_program, PathBuf::from("/cli/client"));
    }

    #[test]
    fn test_positionals_win_over_env_in_external_mode() {
        let config = external(&["4", "bench-host"])
            .build_with_lookup(env_from(&[("BENCH_NUM_CLIENTS", "9"), ("BENCH_ADDRESS", "other")]))
            .unwrap();
        assert_eq!(config.num_clients, 4);
        assert_eq!(config.address, "bench-host");
    }

    #[test]
    fn test_display_flags_applied() {
        let config = external(&["1", "h", "--format", "json", "--color", "--debug"])
            .build_with_lookup(env_from(&[("ENABLE_COLOR", "false")]))
            .unwrap();
        assert_eq!(config.output_format, OutputFormat::Json);
        assert!(config.enable_color);
        assert!(config.debug);
    }

    #[test]
    fn test_invalid_inputs_are_config_errors() {
        let err = external(&["1", " "]).build_with_lookup(no_env).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let err = self_contained(&[])
            .build_with_lookup(env_from(&[("BENCH_GRACE_MS", "later")]))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));

        let err = self_contained(&["--color", "--no-color"]).build_with_lookup(no_env).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfig(_)));
    }

    #[test]
    fn test_config_summary() {
        let config = self_contained(&["--grace-ms", "250"]).build_with_lookup(no_env).unwrap();
        let summary = display_config_summary(&config);
        assert!(summary.contains("Mode: self-contained"));
        assert!(summary.contains("Startup grace: 250ms"));

        let config = external(&["2", "bench-host"]).build_with_lookup(no_env).unwrap();
        let summary = display_config_summary(&config);
        assert!(summary.contains("Address: bench-host"));
        assert!(!summary.contains("Server executable"));
    }
}
