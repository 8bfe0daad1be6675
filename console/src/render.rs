use colored::*;
use shared::{Audit, Candidate, Committed, Error, ResultsReport, VoteReceipt, VoteStatus, Voter};

pub const TOTAL_WIDTH: usize = 40;

pub fn rule() {
    println!("{}", "-".repeat(TOTAL_WIDTH).blue());
}

pub fn header(title: &str) {
    println!("\n{}", format!("--- {} ---", title).cyan());
}

pub fn success(msg: &str) {
    println!("{}", format!("✅ {}", msg).green());
}

pub fn notice(msg: &str) {
    println!("{}", msg.yellow());
}

pub fn failure(err: &Error) {
    println!("{}", format!("❌ {}", err.message).red());
}

fn save_warning<T>(committed: &Committed<T>) {
    if let Some(err) = &committed.save_error {
        let details = err.details.as_deref().unwrap_or(&err.message);
        println!("{}", format!("⚠️  Saved in memory only: {}", details).yellow());
    }
}

pub fn candidate_registered(committed: &Committed<Candidate>) {
    let c = &committed.record;
    success(&format!("Successfully registered candidate: {} (Symbol: {})", c.name, c.symbol));
    save_warning(committed);
}

pub fn voter_registered(committed: &Committed<Voter>) {
    let v = &committed.record;
    success(&format!("Successfully registered voter: {}", v.name));
    notice(&format!("👉 Your Voter ID is: {}", v.id));
    save_warning(committed);
}

pub fn vote_cast(committed: &Committed<VoteReceipt>) {
    success(&format!("Vote cast successfully for {}!", committed.record.candidate.name));
    save_warning(committed);
}

pub fn ballot(voter: &Voter, candidates: &[Candidate]) {
    println!("Hello, {}. Choose from the following candidates:", voter.name);
    rule();
    for c in candidates {
        println!("  - {:<20}  (Symbol: {})", c.name, c.symbol);
    }
    rule();
}

pub fn results(report: &ResultsReport) {
    rule();
    println!("{}", format!("{:<20}{:<10}{}", "Candidate", "Symbol", "Votes").bold());
    rule();
    for c in &report.candidates {
        let marker = if report.is_leader(c.id) { " ★" } else { "" };
        println!("{:<20}{:<10}{}{}", c.name, c.symbol, c.votes.to_string().green(), marker.yellow());
    }
    rule();
    println!(
        "Total votes: {}   Turnout: {:.1}% of {} registered",
        report.total_votes, report.turnout_percent, report.registered_voters
    );
}

pub fn vote_status(status: &VoteStatus) {
    match status {
        VoteStatus::Voted { voter, candidate } => success(&format!(
            "{}, you voted for {} (Symbol: {}).",
            voter.name, candidate.name, candidate.symbol
        )),
        VoteStatus::NotVoted { voter } => notice(&format!("{}, you have not voted yet.", voter.name)),
    }
}

pub fn audit(audit: &Audit) {
    println!("Votes counted for candidates: {}", audit.tallied_votes);
    println!("Voters marked as voted:       {}", audit.ballots_recorded);
    if audit.is_consistent() {
        success("Records are consistent.");
    } else {
        println!("{}", "❌ Records disagree. A save was probably interrupted between the two files.".red());
    }
}
