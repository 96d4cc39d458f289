//! Clap command tree definition.

use clap::{value_parser, Arg, ArgAction, Command};

/// Position after 1.e4, used when `closest` gets no position.
pub const DEFAULT_QUERY_FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 1";

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("studymatch")
        .about("Find annotated chess studies that resemble a played game")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Configuration file (default: ./studymatch.toml if present)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(build_index())
        .subcommand(build_closest())
        .subcommand(build_rank())
        .subcommand(build_config())
}

// =========================================================================
// Index
// =========================================================================

fn build_index() -> Command {
    Command::new("index")
        .about("Replay studies and write the encoded position corpus")
        .arg(
            Arg::new("studies")
                .long("studies")
                .value_name("PATH")
                .required(true)
                .help("JSON array of studies ({\"study_id\", \"title\", \"pgn\"})"),
        )
        .arg(
            Arg::new("out")
                .long("out")
                .value_name("PATH")
                .required(true)
                .help("Where to write the processed position records"),
        )
        .arg(
            Arg::new("sequential")
                .long("sequential")
                .help("Build on the calling thread only")
                .action(ArgAction::SetTrue),
        )
}

// =========================================================================
// Closest
// =========================================================================

fn build_closest() -> Command {
    Command::new("closest")
        .about("Closest corpus positions to one board position")
        .arg(
            Arg::new("position")
                .value_name("FEN|ENCODED")
                .help("FEN, piece placement, or an already encoded position (default: after 1.e4)"),
        )
        .arg(corpus_arg())
        .arg(
            Arg::new("top-n")
                .long("top-n")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("5")
                .help("Number of positions to return"),
        )
}

// =========================================================================
// Rank
// =========================================================================

fn build_rank() -> Command {
    Command::new("rank")
        .about("Rank study chapters against the first game of a PGN")
        .arg(
            Arg::new("game")
                .long("game")
                .value_name("PATH")
                .help("PGN file of the game ('-' or absent for stdin)"),
        )
        .arg(corpus_arg())
        .arg(
            Arg::new("annotations")
                .long("annotations")
                .value_name("PATH")
                .help("JSON array of chapter texts ({\"study_id\", \"chapter\", \"text\"})"),
        )
        .arg(
            Arg::new("top-n")
                .long("top-n")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Chapters to return (default: ranking.top_n_results)"),
        )
        .arg(
            Arg::new("top-n-ply-matches")
                .long("top-n-ply-matches")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .help("Closest positions considered per ply (default: ranking.top_n_ply_matches)"),
        )
}

// =========================================================================
// Config
// =========================================================================

fn build_config() -> Command {
    Command::new("config")
        .about("Configuration file management")
        .subcommand_required(true)
        .subcommand(
            Command::new("init")
                .about("Write a default configuration file if none exists")
                .arg(path_arg()),
        )
        .subcommand(
            Command::new("show")
                .about("Print the effective configuration")
                .arg(path_arg()),
        )
}

fn corpus_arg() -> Arg {
    Arg::new("corpus")
        .long("corpus")
        .value_name("PATH")
        .required(true)
        .help("Processed position records written by `index`")
}

fn path_arg() -> Arg {
    Arg::new("path")
        .long("path")
        .value_name("PATH")
        .help("Configuration file (default: ./studymatch.toml)")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_rank_args() {
        let matches = build_cli()
            .try_get_matches_from([
                "studymatch", "rank", "--corpus", "c.json", "--game", "g.pgn", "--top-n", "7", "--json",
            ])
            .unwrap();
        assert!(matches.get_flag("json"));
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "rank");
        assert_eq!(sub.get_one::<usize>("top-n"), Some(&7));
        assert_eq!(sub.get_one::<usize>("top-n-ply-matches"), None);
        assert_eq!(sub.get_one::<String>("game").map(String::as_str), Some("g.pgn"));
    }

    #[test]
    fn test_closest_defaults() {
        let matches = build_cli()
            .try_get_matches_from(["studymatch", "closest", "--corpus", "c.json"])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<usize>("top-n"), Some(&5));
        assert!(sub.get_one::<String>("position").is_none());
    }

    #[test]
    fn test_index_requires_out() {
        assert!(build_cli()
            .try_get_matches_from(["studymatch", "index", "--studies", "s.json"])
            .is_err());
    }
}
