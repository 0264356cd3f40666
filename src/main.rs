use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;

use fretwork::serialize::{deserialize_collection, DeserializeOptions};
use fretwork::tuning::{apply_conversion, tuning_by_id};
use fretwork::{
    convert_chord_between_tunings, deserialize, from_compact_format, search, serialize, to_compact_format,
    validation, ChordDiagram, FretworkConfig, FretworkError, SearchCriteria,
};

/// Command-line arguments for fretwork
#[derive(Parser, Debug)]
#[command(name = "fretwork")]
#[command(about = "Validate, convert and search chord diagrams")]
#[command(version)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, global = true, env = "FRETWORK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate every diagram in a JSON file (one diagram or an array)
    Validate { file: PathBuf },

    /// Encode a JSON file to compact strings, or decode a compact string to JSON
    Compact { input: String },

    /// Convert the diagrams in a JSON file to another tuning
    Convert {
        file: PathBuf,
        /// Target tuning id, e.g. drop-d
        #[arg(long)]
        to: String,
        /// Source tuning id
        #[arg(long, default_value = "standard")]
        from: String,
        /// Never use a capo
        #[arg(long)]
        no_capo: bool,
    },

    /// Search a JSON collection by name
    Search {
        query: String,
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        fuzzy: bool,
        /// Minimum fuzzy similarity in percent
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long, default_value = "0")]
        page: usize,
    },
}

fn load_diagrams(path: &Path) -> Result<Vec<ChordDiagram>, FretworkError> {
    let content = fs::read_to_string(path)?;
    let lenient = DeserializeOptions {
        validate: false,
        ..DeserializeOptions::default()
    };
    if content.trim_start().starts_with('[') {
        deserialize_collection(&content, &lenient)
    } else {
        Ok(vec![deserialize(&content, &lenient)?])
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), FretworkError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(args: Args) -> Result<bool, FretworkError> {
    let config = match &args.config {
        Some(path) => FretworkConfig::load(path)?,
        None => FretworkConfig::default(),
    };

    match args.command {
        Command::Validate { file } => {
            let diagrams = load_diagrams(&file)?;
            let options = config.validation_options();
            let mut all_valid = true;
            for diagram in &diagrams {
                let result = validation::validate_with_options(diagram, &options);
                all_valid &= result.is_valid;
                println!(
                    "{} ({}): {} score {:.2}",
                    diagram.id,
                    diagram.name,
                    if result.is_valid { "valid" } else { "INVALID" },
                    result.score
                );
                for error in &result.errors {
                    println!("  error: {}", error);
                }
                for warning in &result.warnings {
                    println!("  warning: {} ({})", warning.message, warning.suggestion);
                }
            }
            info!("Validated {} diagram(s)", diagrams.len());
            Ok(all_valid)
        }

        Command::Compact { input } => {
            let path = Path::new(&input);
            if path.exists() {
                for diagram in load_diagrams(path)? {
                    println!("{}", to_compact_format(&diagram)?);
                }
            } else {
                let diagram = from_compact_format(&input)?;
                let options = fretwork::serialize::SerializeOptions {
                    validate: false,
                    ..Default::default()
                };
                println!("{}", serialize(&diagram, &options)?);
            }
            Ok(true)
        }

        Command::Convert {
            file,
            to,
            from,
            no_capo,
        } => {
            let from = tuning_by_id(&from)?;
            let to = tuning_by_id(&to)?;
            let mut options = config.conversion_options();
            if no_capo {
                options.allow_capo = false;
            }

            let mut all_converted = true;
            for diagram in load_diagrams(&file)? {
                let result = convert_chord_between_tunings(&diagram, &from, &to, &options);
                all_converted &= result.success;
                info!(
                    "{}: confidence {:.0}%{}",
                    diagram.name,
                    result.confidence,
                    result
                        .capo_position
                        .map(|c| format!(", capo {}", c))
                        .unwrap_or_default()
                );
                print_json(&apply_conversion(&diagram, &result, &to))?;
            }
            Ok(all_converted)
        }

        Command::Search {
            query,
            file,
            fuzzy,
            threshold,
            page,
        } => {
            let diagrams = load_diagrams(&file)?;
            let mut options = config.search_options();
            options.page = page;
            options.criteria = SearchCriteria {
                name: Some(query),
                fuzzy: fuzzy || options.criteria.fuzzy,
                fuzzy_threshold: threshold.unwrap_or(options.criteria.fuzzy_threshold),
                ..options.criteria
            };

            let results = search(&diagrams, &options);
            for hit in &results.results {
                println!("{:>6.1}  {:<12} {}", hit.score, hit.diagram.name, hit.diagram.id);
            }
            println!(
                "page {} of {} ({} match(es))",
                results.page + 1,
                results.total_pages.max(1),
                results.total_count
            );
            Ok(true)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fretwork=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
