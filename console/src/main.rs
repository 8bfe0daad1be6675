mod commands;
mod logging;
mod menu;
mod render;

use anyhow::Context;
use commands::{CommandLine, Commands};
use shared::{validate_symbol, ElectionService, Error, ErrorCode, VoterId};
use std::io;
use std::process::ExitCode;
use tracing::info;

fn main() -> anyhow::Result<ExitCode> {
    let cli = CommandLine::parse_args();
    logging::init(cli.verbose);

    if cli.candidates.is_none() || cli.voters.is_none() {
        std::fs::create_dir_all(&cli.data_dir)
            .with_context(|| format!("creating data directory {}", cli.data_dir.display()))?;
    }
    let config = cli.storage();
    info!("Using {} and {}", config.candidate_file.display(), config.voter_file.display());
    let mut service = ElectionService::open(&config);

    let Some(command) = cli.command else {
        let mut prompt = menu::Prompt::new(io::stdin().lock());
        menu::run(&mut service, &mut prompt).context("reading from the terminal")?;
        return Ok(ExitCode::SUCCESS);
    };

    match execute(&mut service, command) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            render::failure(&as_election_error(e));
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Election errors pass through unchanged; anything else (an export that
/// cannot be encoded, say) is reported as invalid input with its cause chain.
fn as_election_error(err: anyhow::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(e) => e,
        Err(other) => Error::with_details(ErrorCode::InvalidInput, "Command failed.", format!("{:#}", other)),
    }
}

fn execute(service: &mut ElectionService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Candidate { name, symbol } => {
            let symbol = validate_symbol(&symbol).map_err(Error::from)?;
            render::candidate_registered(&service.register_candidate(&name, symbol)?);
        }
        Commands::Voter { name } => {
            render::voter_registered(&service.register_voter(&name)?);
        }
        Commands::Vote { voter_id, symbol } => {
            let symbol = validate_symbol(&symbol).map_err(Error::from)?;
            render::vote_cast(&service.cast_vote(VoterId(voter_id), symbol)?);
        }
        Commands::Results { json } => {
            let report = service.results()?;
            if json {
                let text = serde_json::to_string_pretty(&report).context("encoding results as JSON")?;
                println!("{}", text);
            } else {
                render::results(&report);
            }
        }
        Commands::MyVote { voter_id } => {
            render::vote_status(&service.vote_of(VoterId(voter_id))?);
        }
        Commands::Audit => {
            render::audit(&service.audit());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::StorageConfig;

    fn service() -> ElectionService {
        let dir = std::env::temp_dir().join(format!("ballot_box_main_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        ElectionService::open(&StorageConfig::in_dir(dir))
    }

    #[test]
    fn election_errors_keep_their_code() {
        let mut service = service();
        let err = execute(&mut service, Commands::Results { json: true }).unwrap_err();
        assert!(as_election_error(err).is(ErrorCode::EmptyCandidateList));

        let err = execute(&mut service, Commands::MyVote { voter_id: 4 }).unwrap_err();
        assert!(as_election_error(err).is(ErrorCode::VoterNotFound));

        let err = execute(&mut service, Commands::Vote { voter_id: 1, symbol: "AB".into() }).unwrap_err();
        assert!(as_election_error(err).is(ErrorCode::InvalidInput));
    }

    #[test]
    fn other_failures_are_reported_with_context() {
        let cause = serde_json::from_str::<u8>("x").unwrap_err();
        let err = anyhow::Error::new(cause).context("encoding results as JSON");
        let reported = as_election_error(err);
        assert!(reported.is(ErrorCode::InvalidInput));
        assert!(reported.details.unwrap().starts_with("encoding results as JSON: "));
    }

    #[test]
    fn json_export_succeeds_with_candidates() {
        let mut service = service();
        execute(&mut service, Commands::Candidate { name: "Ada".into(), symbol: "A".into() }).unwrap();
        execute(&mut service, Commands::Results { json: true }).unwrap();
    }
}
