#![forbid(unsafe_code)]
use colored::*;
use std::env;
use votechain::cli::load_node_from_config;
use votechain::vote::Vote;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <voter-id> <candidate-id> <election-id>", args[0]);
        return Ok(());
    }
    let voter_id: u64 = args[1].parse()?;
    let candidate_id: u64 = args[2].parse()?;
    let election_id: u64 = args[3].parse()?;

    let node = load_node_from_config()?;
    let tail_before = node.last_block().index;

    let admitted = node.submit_vote(Vote::new(voter_id, candidate_id, election_id))?;
    let tail_after = node.last_block();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║                      🗳️  VOTE RECORDED                        ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    println!("Voter:       {}", voter_id);
    println!("Candidate:   {}", candidate_id);
    println!("Election:    {}", election_id);
    println!("Block:       #{}", admitted);

    if tail_after.index > tail_before {
        println!(
            "\n{}",
            format!(
                "⛓️  Block #{} sealed with {} vote(s) (nonce {})",
                tail_after.index,
                tail_after.items.len(),
                tail_after.nonce
            )
            .green()
        );
        println!("   Hash: {}", tail_after.hash);
    } else {
        println!(
            "\n{}",
            format!(
                "⏳ Buffered ({} pending) – will be sealed into block #{}",
                node.pending_count(),
                admitted
            )
            .yellow()
        );
    }

    Ok(())
}
