use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "screening-agent",
    version,
    about = "Dividend stock screening and portfolio evaluation for retail investors"
)]
pub struct Cli {
    /// Pretty-print the JSON result
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Screen every symbol in the metrics snapshot against the saved profile
    Rank {
        /// Maximum number of ranked assets (defaults to RANKING_LIMIT)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Score, classify and explain a single asset
    Explain { symbol: String },
    /// Evaluate a JSON array of {"symbol", "capital"} allocations
    Portfolio { file: PathBuf },
    /// Rank, then split the profile's available capital across the top assets
    Plan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rank_with_limit() {
        let cli = Cli::try_parse_from(["screening-agent", "rank", "--limit", "3"]).unwrap();
        assert!(matches!(cli.command, Command::Rank { limit: Some(3) }));
        assert!(!cli.pretty);
    }

    #[test]
    fn test_parse_explain_pretty() {
        let cli =
            Cli::try_parse_from(["screening-agent", "--pretty", "explain", "TAEE11.SA"]).unwrap();
        assert!(cli.pretty);
        match cli.command {
            Command::Explain { symbol } => assert_eq!(symbol, "TAEE11.SA"),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["screening-agent", "trade"]).is_err());
        assert!(Cli::try_parse_from(["screening-agent"]).is_err());
    }
}
