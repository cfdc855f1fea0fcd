//! List commands implementation

use crate::transports;

/// List all supported transports
pub fn list_transports() {
    let transports = transports::available_transports();

    if transports.is_empty() {
        println!("No transports available (recompile with transport features enabled)");
        return;
    }

    println!("Supported transports:");
    println!();
    for t in &transports {
        println!("  {:12} - {}", t.name, t.description);
        if !t.aliases.is_empty() {
            println!("  {:12}   aliases: {}", "", t.aliases.join(", "));
        }
    }
}
