use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "provision")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Idempotent provisioning: install a tool from an archive, or purge a package environment", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Download, unpack and register the configured tool
    Install(RunArgs),

    /// Uninstall every package except the exempt one
    Purge(RunArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct RunArgs {
    /// Check each step without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_needed() {
        let cli = Cli::try_parse_from(["provision", "install"]).unwrap();
        assert!(matches!(cli.command, Command::Install(RunArgs { dry_run: false })));
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["provision", "purge", "--dry-run", "-vv", "--config", "x.toml"])
                .unwrap();
        assert!(matches!(cli.command, Command::Purge(RunArgs { dry_run: true })));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["provision", "config", "path"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }
}
