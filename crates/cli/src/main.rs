//! studymatch CLI — find annotated chess studies that resemble a game.
//!
//! Subcommands:
//! - **index**: replay a study collection and write the encoded corpus
//! - **closest**: closest corpus positions to one board position
//! - **rank**: rank study chapters against a played game
//! - **config**: write or print `studymatch.toml`
//!
//! Logging goes to stderr, filtered by `RUST_LOG` (default `warn`).

mod commands;
mod format;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use studymatch_core::{StudyDocument, StudyMatchConfig, CONFIG_FILE_NAME};
use studymatch_rules::StandardReplayer;
use studymatch_search::{AnnotationMap, CorpusBuilder, CorpusIndex, PositionEncoder, StudySearch};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{build_cli, DEFAULT_QUERY_FEN};
use format::{format_build, format_closest, format_config, format_error, format_ranking, OutputMode};

fn main() {
    init_tracing();

    let matches = build_cli().get_matches();
    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match run(&matches, mode) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches, mode: OutputMode) -> Result<String> {
    match matches.subcommand() {
        Some(("index", sub)) => run_index(sub, &load_config(matches)?, mode),
        Some(("closest", sub)) => run_closest(sub, &load_config(matches)?, mode),
        Some(("rank", sub)) => run_rank(sub, &load_config(matches)?, mode),
        Some(("config", sub)) => run_config(matches, sub, mode),
        _ => bail!("no subcommand given"),
    }
}

// =========================================================================
// Configuration
// =========================================================================

fn config_path(matches: &ArgMatches) -> PathBuf {
    matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Explicit `--config` must exist; the default file is optional.
fn load_config(matches: &ArgMatches) -> Result<StudyMatchConfig> {
    let explicit = matches.get_one::<String>("config").is_some();
    let path = config_path(matches);
    if !explicit && !path.exists() {
        return Ok(StudyMatchConfig::default());
    }
    let config = StudyMatchConfig::from_file(&path)?;
    info!(target: "studymatch::cli", path = %path.display(), "Loaded configuration");
    Ok(config)
}

fn run_config(matches: &ArgMatches, sub: &ArgMatches, mode: OutputMode) -> Result<String> {
    let (action, args) = sub.subcommand().context("missing config action")?;
    let path = args
        .get_one::<String>("path")
        .map(PathBuf::from)
        .unwrap_or_else(|| config_path(matches));
    match action {
        "init" => {
            let existed = path.exists();
            StudyMatchConfig::write_default_if_missing(&path)?;
            Ok(if existed {
                format!("{} already exists", path.display())
            } else {
                format!("Wrote {}", path.display())
            })
        }
        "show" => {
            let config = if path.exists() {
                StudyMatchConfig::from_file(&path)?
            } else {
                StudyMatchConfig::default()
            };
            Ok(format_config(&config, mode))
        }
        other => bail!("unknown config action '{}'", other),
    }
}

// =========================================================================
// Index
// =========================================================================

fn load_studies(path: &Path) -> Result<Vec<StudyDocument>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read studies file '{}'", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse studies file '{}'", path.display()))
}

fn run_index(sub: &ArgMatches, config: &StudyMatchConfig, mode: OutputMode) -> Result<String> {
    let studies_path = required_path(sub, "studies")?;
    let out = required_path(sub, "out")?;

    let studies = load_studies(&studies_path)?;
    let replayer = StandardReplayer::new();
    let mut builder =
        CorpusBuilder::new(&replayer, PositionEncoder::from_config(&config.encoder)).with_config(&config.index);
    if sub.get_flag("sequential") {
        builder = builder.parallel(false);
    }
    let outcome = builder.build(&studies)?;
    outcome
        .index
        .write_records_file(&out)
        .with_context(|| format!("failed to write corpus '{}'", out.display()))?;

    Ok(format_build(&outcome, &out.display().to_string(), mode))
}

// =========================================================================
// Closest
// =========================================================================

/// Whether `input` is a FEN or piece placement rather than an encoding.
///
/// Encodings never contain digits or whitespace.
fn looks_like_fen(input: &str) -> bool {
    input.contains(char::is_whitespace) || input.contains(|c: char| c.is_ascii_digit())
}

fn run_closest(sub: &ArgMatches, config: &StudyMatchConfig, mode: OutputMode) -> Result<String> {
    let search = open_search(sub, config)?;
    let k = sub.get_one::<usize>("top-n").copied().unwrap_or(5);
    let position = sub
        .get_one::<String>("position")
        .map(String::as_str)
        .unwrap_or(DEFAULT_QUERY_FEN);

    let response = if looks_like_fen(position) {
        search.closest_positions(position, k)?
    } else {
        search.closest_encoded(position.to_string(), k)?
    };
    Ok(format_closest(&response, mode))
}

// =========================================================================
// Rank
// =========================================================================

fn read_game(sub: &ArgMatches) -> Result<String> {
    match sub.get_one::<String>("game").map(String::as_str) {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read game '{}'", path))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read game from stdin")?;
            Ok(text)
        }
    }
}

fn run_rank(sub: &ArgMatches, config: &StudyMatchConfig, mode: OutputMode) -> Result<String> {
    let mut search = open_search(sub, config)?;
    if let Some(path) = sub.get_one::<String>("annotations") {
        let annotations = AnnotationMap::load_file(Path::new(path))
            .with_context(|| format!("failed to load annotations '{}'", path))?;
        search = search.with_annotations(Arc::new(annotations));
    }
    if let Some(&n) = sub.get_one::<usize>("top-n-ply-matches") {
        search = search.with_top_n_ply_matches(n);
    }
    let top_n = sub
        .get_one::<usize>("top-n")
        .copied()
        .unwrap_or(config.ranking.top_n_results);

    let pgn = read_game(sub)?;
    let response = search.rank_pgn(&StandardReplayer::new(), &pgn, top_n)?;
    Ok(format_ranking(&response, &search, mode))
}

// =========================================================================
// Helpers
// =========================================================================

fn required_path(sub: &ArgMatches, name: &str) -> Result<PathBuf> {
    sub.get_one::<String>(name)
        .map(PathBuf::from)
        .with_context(|| format!("--{} is required", name))
}

fn open_search(sub: &ArgMatches, config: &StudyMatchConfig) -> Result<StudySearch> {
    let path = required_path(sub, "corpus")?;
    let corpus = CorpusIndex::load_records_file(&path)
        .with_context(|| format!("failed to load corpus '{}'", path.display()))?;
    Ok(StudySearch::new(Arc::new(corpus), config))
}
