use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the autosweep tool.
///
/// This struct defines all available command-line options for the
/// collection framework. Options cover output placement, session
/// configuration, source selection, and subcommands.
#[derive(Parser, Debug)]
#[clap(name = "autosweep", about = "Concurrent forensic source collection")]
pub struct Args {
    /// Local output path (default: %TEMP%/autosweep or /tmp/autosweep)
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Path to configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Restrict the run to specific source ids (comma-separated)
    #[clap(short = 's', long)]
    pub sources: Option<String>,

    /// Keep a pre-existing output directory instead of clearing it
    #[clap(long)]
    pub keep_existing: bool,

    /// Skip the authorization request pass and run with whatever is
    /// already granted
    #[clap(long)]
    pub no_grant_requests: bool,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the collector.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = "config.yaml")]
        path: PathBuf,
    },

    /// List registered sources and their readiness
    ListSources,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_basic_args_parsing() {
        let args = Args::parse_from(&[
            "autosweep",
            "--output", "/tmp/output",
            "--verbose",
        ]);

        assert_eq!(args.output, Some(PathBuf::from("/tmp/output")));
        assert!(args.verbose);
        assert!(!args.keep_existing);
        assert!(!args.no_grant_requests);
    }

    #[test]
    fn test_default_values() {
        let args = Args::parse_from(&["autosweep"]);

        assert!(args.output.is_none());
        assert!(args.config.is_none());
        assert!(args.sources.is_none());
        assert!(!args.keep_existing);
        assert!(!args.no_grant_requests);
        assert!(!args.verbose);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_source_selection_and_config() {
        let args = Args::parse_from(&[
            "autosweep",
            "--config", "/path/to/config.yaml",
            "--sources", "system_info,processes",
            "--keep-existing",
            "--no-grant-requests",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("/path/to/config.yaml")));
        assert_eq!(args.sources, Some("system_info,processes".to_string()));
        assert!(args.keep_existing);
        assert!(args.no_grant_requests);
    }

    #[test]
    fn test_init_config_subcommand() {
        let args = Args::parse_from(&[
            "autosweep",
            "init-config",
            "custom-config.yaml",
        ]);

        match args.command {
            Some(Commands::InitConfig { path }) => {
                assert_eq!(path, PathBuf::from("custom-config.yaml"));
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_init_config_default_path() {
        let args = Args::parse_from(&["autosweep", "init-config"]);

        match args.command {
            Some(Commands::InitConfig { path }) => {
                assert_eq!(path, PathBuf::from("config.yaml"));
            }
            _ => panic!("Expected InitConfig command"),
        }
    }

    #[test]
    fn test_list_sources_subcommand() {
        let args = Args::parse_from(&["autosweep", "list-sources"]);
        assert!(matches!(args.command, Some(Commands::ListSources)));
    }
}
