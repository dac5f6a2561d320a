use clap::{Parser, Subcommand};
use gridfilter::catalog::EquipmentType;
use once_cell::sync::Lazy;
use std::path::PathBuf;

/// "0.1.0" for releases, "0.1.0@abc1234 2026-01-15 14:30" for dev builds.
static VERSION: Lazy<String> = Lazy::new(|| {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    if IS_RELEASE == "true" || GIT_HASH.is_empty() {
        VERSION.to_string()
    } else {
        format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
    }
});

#[derive(Parser, Debug)]
#[command(name = "gridfilter", version = VERSION.as_str())]
#[command(about = "Build, validate and store expert filters over power-grid equipment", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a filter file (wire JSON, `-` for stdin)
    #[command(alias = "c")]
    Check {
        file: PathBuf,
    },

    /// Create a filter from a wire JSON file
    #[command(alias = "n")]
    Create {
        /// Name of the filter
        name: String,

        /// Wire JSON file holding the rules (`-` for stdin)
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Directory label (defaults to the configured one)
        #[arg(long)]
        directory: Option<String>,

        /// Equipment type (defaults to the configured one)
        #[arg(short, long, value_parser = parse_equipment)]
        equipment: Option<EquipmentType>,
    },

    /// Replace the rules, name or description of a filter
    #[command(alias = "u")]
    Update {
        /// Filter index, id or name
        filter: String,

        /// Wire JSON file holding the new rules (`-` for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show a filter and its rule tree
    #[command(alias = "v")]
    Show {
        /// Filter index, id or name
        filter: String,

        /// Print the stored wire JSON instead
        #[arg(long)]
        json: bool,
    },

    /// List filters
    #[command(alias = "ls")]
    List {
        /// Only filters of this equipment type
        #[arg(short, long, value_parser = parse_equipment)]
        equipment: Option<EquipmentType>,
    },

    /// Delete one or more filters
    #[command(alias = "rm")]
    Delete {
        /// Filter indexes, ids or names
        #[arg(required = true, num_args = 1..)]
        filters: Vec<String>,
    },

    /// Remove one node of a filter by path (e.g. 0.1.0)
    RemoveRule {
        /// Filter index, id or name
        filter: String,

        /// Node path, the root being 0
        path: String,
    },

    /// List the fields rules can target, with their operators
    Fields {
        #[arg(short, long, value_parser = parse_equipment)]
        equipment: Option<EquipmentType>,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., default_equipment_type)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

fn parse_equipment(s: &str) -> Result<EquipmentType, String> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create() {
        let cli = Cli::parse_from([
            "gridfilter", "create", "Gens", "--file", "rules.json", "-e", "load",
        ]);
        match cli.command {
            Some(Commands::Create {
                name,
                file,
                equipment,
                description,
                ..
            }) => {
                assert_eq!(name, "Gens");
                assert_eq!(file, PathBuf::from("rules.json"));
                assert_eq!(equipment, Some(EquipmentType::Load));
                assert_eq!(description, "");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_equipment() {
        assert!(Cli::try_parse_from(["gridfilter", "fields", "-e", "turbine"]).is_err());
    }
}
