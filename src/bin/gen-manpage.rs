//! Man page generator for spdread
//!
//! Writes `spdread.1` plus one `spdread-<command>.1` page per subcommand.
//!
//! Usage: cargo run --bin gen-manpage -- [output-dir]

use clap::CommandFactory;
use std::fs;
use std::path::PathBuf;

#[path = "../cli.rs"]
mod cli;

// Needed by cli.rs for the transport help text
#[allow(dead_code)]
#[path = "../transports.rs"]
mod transports;

/// Render the top-level page and one page per subcommand
fn render_pages(cmd: clap::Command) -> std::io::Result<Vec<(String, Vec<u8>)>> {
    let mut pages = Vec::new();

    let mut buffer = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut buffer)?;
    pages.push((format!("{}.1", cmd.get_name()), buffer));

    for sub in cmd.get_subcommands().filter(|s| s.get_name() != "help") {
        let name = format!("{}-{}", cmd.get_name(), sub.get_name());
        let mut buffer = Vec::new();
        clap_mangen::Man::new(sub.clone().name(name.clone())).render(&mut buffer)?;
        pages.push((format!("{}.1", name), buffer));
    }

    Ok(pages)
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Default to ./man directory
    let output_dir = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        PathBuf::from("man")
    };

    fs::create_dir_all(&output_dir)?;

    for (file, page) in render_pages(cli::Cli::command())? {
        let output_path = output_dir.join(file);
        fs::write(&output_path, page)?;
        println!("Man page generated at: {}", output_path.display());
    }

    println!("\nTo view the main page:");
    println!("  man -l {}", output_dir.join("spdread.1").display());

    Ok(())
}
