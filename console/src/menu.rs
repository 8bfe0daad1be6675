use colored::*;
use shared::{validate_name, validate_symbol, ElectionService, Error, ErrorCode, VoterId};
use std::io::{self, BufRead, Write};

use crate::render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    RegisterCandidate,
    RegisterVoter,
    CastVote,
    Results,
    MyVote,
    Exit,
    Audit,
}

impl MenuChoice {
    const ALL: [(MenuChoice, &'static str); 7] = [
        (MenuChoice::RegisterCandidate, "Register a Candidate"),
        (MenuChoice::RegisterVoter, "Register a Voter"),
        (MenuChoice::CastVote, "Cast Your Vote"),
        (MenuChoice::Results, "View Live Results"),
        (MenuChoice::MyVote, "View My Vote"),
        (MenuChoice::Exit, "Exit"),
        (MenuChoice::Audit, "Audit Records"),
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).map(|(choice, _)| *choice)
    }
}

/// Line-oriented prompts over any reader. `None` means the input ended.
pub struct Prompt<R> {
    reader: R,
}

impl<R: BufRead> Prompt<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn ask(&mut self, label: &str) -> io::Result<Option<String>> {
        print!("{}", label);
        io::stdout().flush()?;
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn ask_voter_id(&mut self) -> io::Result<Option<Option<VoterId>>> {
        let Some(line) = self.ask("Enter your Voter ID: ")? else {
            return Ok(None);
        };
        match line.trim().parse() {
            Ok(id) => Ok(Some(Some(VoterId(id)))),
            Err(_) => {
                println!("{}", "❌ Invalid input. Please enter a number.".red());
                Ok(Some(None))
            }
        }
    }
}

fn display_menu() {
    let bar = "=".repeat(render::TOTAL_WIDTH);
    println!("\n{}", bar.blue().bold());
    println!("{}", "        🗳️  Online Voting System".cyan().bold());
    println!("{}", bar.blue().bold());
    for (n, (choice, label)) in MenuChoice::ALL.iter().enumerate() {
        if *choice == MenuChoice::Exit {
            println!("{}", format!("{}. {}", n + 1, label).red());
        } else {
            println!("{}{}", format!("{}. ", n + 1).green(), label);
        }
    }
    println!("{}", bar.blue().bold());
}

/// Runs the interactive menu until the user exits or the input ends.
pub fn run<R: BufRead>(service: &mut ElectionService, prompt: &mut Prompt<R>) -> io::Result<()> {
    loop {
        display_menu();
        let Some(line) = prompt.ask(&"👉 Enter your choice: ".yellow().to_string())? else {
            return Ok(());
        };

        let finished = match MenuChoice::parse(&line) {
            Some(MenuChoice::Exit) => {
                render::success("Exiting program. Goodbye!");
                return Ok(());
            }
            Some(choice) => dispatch(service, prompt, choice)?,
            None => {
                println!("{}", "❌ Invalid choice. Try again.".red());
                false
            }
        };
        if finished {
            return Ok(());
        }

        if prompt.ask(&"\nPress Enter to continue...".yellow().to_string())?.is_none() {
            return Ok(());
        }
    }
}

/// Returns `true` when the input ran out mid-dialogue.
fn dispatch<R: BufRead>(service: &mut ElectionService, prompt: &mut Prompt<R>, choice: MenuChoice) -> io::Result<bool> {
    match choice {
        MenuChoice::RegisterCandidate => register_candidate(service, prompt),
        MenuChoice::RegisterVoter => register_voter(service, prompt),
        MenuChoice::CastVote => cast_vote(service, prompt),
        MenuChoice::Results => {
            render::header("📊 Current Voting Results");
            match service.results() {
                Ok(report) => render::results(&report),
                Err(e) => render::failure(&e),
            }
            Ok(false)
        }
        MenuChoice::MyVote => {
            render::header("🔍 View My Vote");
            let Some(id) = prompt.ask_voter_id()? else { return Ok(true) };
            if let Some(id) = id {
                match service.vote_of(id) {
                    Ok(status) => render::vote_status(&status),
                    Err(e) => render::failure(&e),
                }
            }
            Ok(false)
        }
        MenuChoice::Audit => {
            render::header("🧾 Audit Records");
            render::audit(&service.audit());
            Ok(false)
        }
        MenuChoice::Exit => Ok(true),
    }
}

fn register_candidate<R: BufRead>(service: &mut ElectionService, prompt: &mut Prompt<R>) -> io::Result<bool> {
    render::header("🧑‍💼 Candidate Registration");
    let Some(name) = prompt.ask("Enter candidate name: ")? else { return Ok(true) };
    if let Err(e) = validate_name(&name) {
        render::failure(&Error::from(e));
        return Ok(false);
    }

    loop {
        let Some(input) = prompt.ask("Enter candidate symbol (single character): ")? else {
            return Ok(true);
        };
        let symbol = match validate_symbol(&input) {
            Ok(symbol) => symbol,
            Err(e) => {
                render::failure(&Error::from(e));
                continue;
            }
        };

        match service.register_candidate(&name, symbol) {
            Ok(committed) => {
                render::candidate_registered(&committed);
                return Ok(false);
            }
            Err(e) if e.is(ErrorCode::DuplicateSymbol) => render::failure(&e),
            Err(e) => {
                render::failure(&e);
                return Ok(false);
            }
        }
    }
}

fn register_voter<R: BufRead>(service: &mut ElectionService, prompt: &mut Prompt<R>) -> io::Result<bool> {
    render::header("🧑‍🤝‍🧑 Voter Registration");
    let Some(name) = prompt.ask("Enter voter name: ")? else { return Ok(true) };
    match service.register_voter(&name) {
        Ok(committed) => render::voter_registered(&committed),
        Err(e) => render::failure(&e),
    }
    Ok(false)
}

fn cast_vote<R: BufRead>(service: &mut ElectionService, prompt: &mut Prompt<R>) -> io::Result<bool> {
    render::header("🗳️ Cast Your Vote");
    let Some(id) = prompt.ask_voter_id()? else { return Ok(true) };
    let Some(id) = id else { return Ok(false) };

    match service.eligible_voter(id) {
        Ok(voter) => render::ballot(voter, service.candidates()),
        Err(e) => {
            render::failure(&e);
            return Ok(false);
        }
    }

    let Some(input) = prompt.ask("Enter candidate symbol: ")? else { return Ok(true) };
    let symbol = match validate_symbol(&input) {
        Ok(symbol) => symbol,
        Err(_) => {
            render::failure(&Error::new(ErrorCode::CandidateNotFound, "Invalid candidate symbol. Vote not cast."));
            return Ok(false);
        }
    };

    match service.cast_vote(id, symbol) {
        Ok(committed) => render::vote_cast(&committed),
        Err(e) if e.is(ErrorCode::CandidateNotFound) => {
            render::failure(&Error::new(e.code, "Invalid candidate symbol. Vote not cast."))
        }
        Err(e) => render::failure(&e),
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{StorageConfig, Symbol, VoteStatus};
    use std::io::Cursor;

    fn service() -> ElectionService {
        let dir = std::env::temp_dir().join(format!("ballot_box_menu_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        ElectionService::open(&StorageConfig::in_dir(dir))
    }

    fn drive(service: &mut ElectionService, script: &str) {
        let mut prompt = Prompt::new(Cursor::new(script.as_bytes().to_vec()));
        run(service, &mut prompt).unwrap();
    }

    #[test]
    fn parses_menu_numbers() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::RegisterCandidate));
        assert_eq!(MenuChoice::parse(" 6 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("7"), Some(MenuChoice::Audit));
        assert_eq!(MenuChoice::parse("0"), None);
        assert_eq!(MenuChoice::parse("8"), None);
        assert_eq!(MenuChoice::parse("vote"), None);
    }

    #[test]
    fn full_session_registers_and_votes() {
        let mut service = service();
        drive(&mut service, concat!(
            "1\nAda Lovelace\nA\n\n",
            "1\nBo\nA\nAB\nB\n\n",
            "2\nCid\n\n",
            "3\n1\nB\n\n",
            "3\n1\n\n",
            "4\n\n",
            "6\n",
        ));

        let symbols: Vec<char> = service.candidates().iter().map(|c| c.symbol.as_char()).collect();
        assert_eq!(symbols, vec!['A', 'B']);
        assert_eq!(service.candidates()[1].votes, 1);
        match service.vote_of(VoterId(1)).unwrap() {
            VoteStatus::Voted { candidate, .. } => assert_eq!(candidate.symbol, Symbol::new('B').unwrap()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_input_does_not_end_the_session() {
        let mut service = service();
        drive(&mut service, "x\n\n3\nabc\n\n3\n42\n\n2\nDee\n\n3\n1\nZ\n\n");

        assert!(!service.find_voter(VoterId(1)).unwrap().has_voted());
        assert_eq!(service.audit().tallied_votes, 0);
    }

    #[test]
    fn input_ending_mid_dialogue_stops_cleanly() {
        let mut service = service();
        drive(&mut service, "1\nAda\n");
        assert!(service.candidates().is_empty());
    }
}
