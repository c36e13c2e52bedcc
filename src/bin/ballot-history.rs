#![forbid(unsafe_code)]
//! Inspect the vote chain: every sealed block plus the validation verdict.

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use votechain::cli::{format_timestamp, load_node_from_config, short_hash};

const LOGO: &str = r#"
╔═══════════════════════════════════════════════════════════════╗
║                 🗳️  VoteChain - Ballot History                ║
╚═══════════════════════════════════════════════════════════════╝
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", LOGO.bright_cyan());

    let node = load_node_from_config()?;
    let chain = node.chain_snapshot();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Block", "Sealed", "Votes", "Nonce", "Hash", "Previous"]);

    for block in &chain {
        table.add_row(vec![
            Cell::new(format!("#{}", block.index)),
            Cell::new(format_timestamp(block.timestamp)),
            Cell::new(block.items.len()),
            Cell::new(block.nonce),
            Cell::new(short_hash(&block.hash)),
            Cell::new(short_hash(&block.previous_hash)),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "Blocks: {}   Pending votes: {}",
        chain.len(),
        node.pending_count()
    );

    if node.validate() {
        println!("{}", "✅ Chain integrity verified".green().bold());
    } else {
        println!("{}", "❌ Chain integrity check FAILED".red().bold());
    }

    Ok(())
}
