use clap::{ArgAction, Parser, Subcommand};
use shared::StorageConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ballot-box")]
#[command(about = "Register candidates and voters, cast votes and count them.")]
pub struct CommandLine {
    /// Directory holding candidates.txt and voters.txt
    #[arg(long, global = true, env = "BALLOT_BOX_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,
    /// Candidate table, overriding the one in the data directory
    #[arg(long, global = true)]
    pub candidates: Option<PathBuf>,
    /// Voter table, overriding the one in the data directory
    #[arg(long, global = true)]
    pub voters: Option<PathBuf>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Without a command the interactive menu starts
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a candidate
    #[command(alias = "c")]
    Candidate {
        name: String,
        /// Single character the candidate is voted by
        #[arg(short, long)]
        symbol: String,
    },
    /// Register a voter and print their voter ID
    Voter { name: String },
    /// Cast a vote
    Vote { voter_id: u32, symbol: String },
    /// Show the current results
    #[command(alias = "r")]
    Results {
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show who a voter voted for
    MyVote { voter_id: u32 },
    /// Check that vote counts and voter records agree
    Audit,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn storage(&self) -> StorageConfig {
        let mut config = StorageConfig::in_dir(&self.data_dir);
        if let Some(path) = &self.candidates {
            config.candidate_file = path.clone();
        }
        if let Some(path) = &self.voters {
            config.voter_file = path.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_defaults_to_data_dir() {
        let cli = CommandLine::parse_from(["ballot-box", "--data-dir", "/tmp/election", "results"]);
        let config = cli.storage();
        assert_eq!(config.candidate_file, PathBuf::from("/tmp/election/candidates.txt"));
        assert_eq!(config.voter_file, PathBuf::from("/tmp/election/voters.txt"));
        assert!(matches!(cli.command, Some(Commands::Results { json: false })));
    }

    #[test]
    fn file_overrides_and_vote_args() {
        let cli = CommandLine::parse_from(["ballot-box", "vote", "3", "A", "--voters", "v.txt", "-vv"]);
        assert_eq!(cli.storage().voter_file, PathBuf::from("v.txt"));
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Vote { voter_id, symbol }) => assert_eq!((voter_id, symbol.as_str()), (3, "A")),
            _ => panic!("expected vote command"),
        }
    }
}
