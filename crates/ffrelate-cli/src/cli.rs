use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "ffrelate CLI - resolve forcefield parameters for molecules, residues and atoms from a relationship database.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the parameter bound to the most specific relationship matching an entity.
    Resolve(ResolveArgs),
    /// List every registered relationship with its specificity score.
    List(DatabaseArgs),
    /// Write a snapshot of the loaded database in TOML format.
    Snapshot(SnapshotArgs),
}

/// Where to load the parameter database from.
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Path to the parameter database description file (TOML).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub database: PathBuf,
}

/// Arguments for the `resolve` subcommand.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub source: DatabaseArgs,

    /// Name of the parameter table to resolve against (e.g., 'charge').
    #[arg(short, long, required = true, value_name = "NAME")]
    pub table: String,

    /// Print every candidate relationship, most specific first.
    #[arg(long)]
    pub explain: bool,

    #[command(flatten)]
    pub entity: EntityArgs,
}

/// The concrete entity to resolve. The finest level given decides the query level.
#[derive(Args, Debug, Default)]
pub struct EntityArgs {
    // --- Molecule ---
    /// Molecule name.
    #[arg(long, value_name = "NAME")]
    pub molecule: Option<String>,

    /// Molecule group.
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Molecule state.
    #[arg(long, value_name = "NAME")]
    pub state: Option<String>,

    // --- Residue ---
    /// Residue name.
    #[arg(short, long, value_name = "NAME")]
    pub residue: Option<String>,

    /// Residue number (non-zero).
    #[arg(short = 'n', long, value_name = "INT", allow_negative_numbers = true)]
    pub residue_number: Option<i32>,

    /// Extra residue aliases, in addition to those declared in the database file.
    #[arg(long = "alias", value_name = "NAME", value_delimiter = ',')]
    pub aliases: Vec<String>,

    /// Atoms of the residue that take part in inter-residue bonds.
    #[arg(long, value_name = "ATOM", value_delimiter = ',')]
    pub bonded: Vec<String>,

    // --- Atom ---
    /// Atom name.
    #[arg(short, long, value_name = "NAME")]
    pub atom: Option<String>,

    /// Atom number (non-zero).
    #[arg(long, value_name = "INT")]
    pub atom_number: Option<u32>,

    /// Atom type.
    #[arg(long, value_name = "NAME")]
    pub atom_type: Option<String>,

    /// Element symbol (e.g., 'C').
    #[arg(short, long, value_name = "SYMBOL")]
    pub element: Option<String>,
}

/// Arguments for the `snapshot` subcommand.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub source: DatabaseArgs,

    /// Path for the output snapshot file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,
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
    fn resolve_parses_entity_fields() {
        let cli = Cli::try_parse_from([
            "ffrelate", "resolve", "-d", "db.toml", "-t", "charge", "--molecule", "ALA", "-n",
            "-3", "--bonded", "N,C", "-a", "CA",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.table, "charge");
                assert_eq!(args.entity.molecule.as_deref(), Some("ALA"));
                assert_eq!(args.entity.residue_number, Some(-3));
                assert_eq!(args.entity.bonded, vec!["N".to_string(), "C".to_string()]);
                assert_eq!(args.entity.atom.as_deref(), Some("CA"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["ffrelate", "-q", "-v", "list", "-d", "db.toml"]);
        assert!(result.is_err());
    }
}
