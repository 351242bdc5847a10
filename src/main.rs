use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use dirjump::index::{self, DirectoryIndex};
use dirjump::output;
use dirjump::utils::AppConfig;
use std::path::PathBuf;
use std::process::ExitCode;
use termcolor::ColorChoice;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dirjump")]
#[command(about = "Jump to any folder by typing name prefixes or acronym fragments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search terms (when no subcommand is given). Use `--` before terms that
    /// look like flags or subcommand names.
    terms: Vec<String>,

    /// Print every match instead of only the best one
    #[arg(short, long)]
    all: bool,

    /// Print at most this many matches
    #[arg(short = 'n', long, conflicts_with = "all")]
    limit: Option<usize>,

    /// Don't prefer matches related to the current directory
    #[arg(long)]
    anywhere: bool,

    /// Index file to use instead of the configured one
    #[arg(long, global = true)]
    index: Option<PathBuf>,

    /// When to use colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    /// Log more (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or rebuild the index
    Index {
        /// Directory to index (defaults to the configured root or home)
        path: Option<PathBuf>,

        /// Don't show a progress spinner
        #[arg(short, long)]
        quiet: bool,
    },
    /// Print the acronym of a path
    Acronym {
        #[arg(default_value = ".")]
        path: PathBuf,
    },
    /// Show index statistics
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if std::io::IsTerminal::is_terminal(&std::io::stdout()) => {
                ColorChoice::Auto
            }
            ColorMode::Auto | ColorMode::Never => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = AppConfig::load()?;
    let index_path = match &cli.index {
        Some(path) => path.clone(),
        None => config.index_path()?,
    };
    let color = cli.color.choice();

    match cli.command {
        Some(Commands::Index { path, quiet }) => {
            let root = match path {
                Some(path) => path,
                None => config.root()?,
            };
            let index = index::build_index_with_progress(&root, &config.build_options(), quiet)?;
            index.save(&index_path)?;
            if !quiet {
                println!(
                    "Indexed {} directories into {}",
                    index.len(),
                    index_path.display()
                );
            }
        }
        Some(Commands::Acronym { path }) => {
            println!("{}", index::acronym(&path));
        }
        Some(Commands::Stats { json }) => {
            index::stats::show_stats(&index_path, json)?;
        }
        None => {
            if cli.terms.is_empty() {
                bail!("Nothing to search for. Pass one or more terms, e.g. `dirjump proj bR`");
            }

            let index = match DirectoryIndex::load(&index_path) {
                Ok(index) => index,
                Err(err) if err.is_not_found() => {
                    bail!("No index found. Run 'dirjump index' first.")
                }
                Err(err) => {
                    return Err(err).with_context(|| {
                        format!(
                            "Failed to load {}; run 'dirjump index' to rebuild it",
                            index_path.display()
                        )
                    });
                }
            };

            let current_dir = if cli.anywhere {
                None
            } else {
                std::env::current_dir().ok()
            };
            let mut results = index.search(cli.terms.as_slice(), current_dir.as_deref());

            if results.is_empty() {
                output::print_no_matches(&cli.terms, color)?;
                return Ok(ExitCode::FAILURE);
            }

            if !cli.all {
                results.truncate(cli.limit.unwrap_or(1));
            }
            output::print_paths(&results, color)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dirjump").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_after_terms() {
        let cli = parse(&["proj", "--all", "--index", "/tmp/dirs.idx"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.terms, vec!["proj"]);
        assert!(cli.all);
        assert_eq!(cli.index, Some(PathBuf::from("/tmp/dirs.idx")));

        let cli = parse(&["proj", "bR", "-n", "2", "--anywhere"]);
        assert_eq!(cli.terms, vec!["proj", "bR"]);
        assert_eq!(cli.limit, Some(2));
        assert!(cli.anywhere);
    }

    #[test]
    fn test_flags_before_terms() {
        let cli = parse(&["--all", "-v", "proj"]);
        assert_eq!(cli.terms, vec!["proj"]);
        assert!(cli.all);
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_global_option_before_subcommand() {
        let cli = parse(&["--index", "/tmp/dirs.idx", "index", "/src", "-q"]);
        assert!(cli.terms.is_empty());
        assert_eq!(cli.index, Some(PathBuf::from("/tmp/dirs.idx")));
        assert!(matches!(
            cli.command,
            Some(Commands::Index { path: Some(ref path), quiet: true }) if path == Path::new("/src")
        ));
    }

    #[test]
    fn test_global_option_after_subcommand() {
        let cli = parse(&["stats", "--json", "--index", "/tmp/dirs.idx"]);
        assert_eq!(cli.index, Some(PathBuf::from("/tmp/dirs.idx")));
        assert!(matches!(cli.command, Some(Commands::Stats { json: true })));
    }

    #[test]
    fn test_subcommand_name_as_later_term() {
        // Only the first positional can select a subcommand
        let cli = parse(&["proj", "index"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.terms, vec!["proj", "index"]);

        let cli = parse(&["--", "stats"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.terms, vec!["stats"]);
    }

    #[test]
    fn test_limit_conflicts_with_all() {
        let args = ["dirjump", "proj", "--all", "-n", "2"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
