//! The `rules` command: list the rule catalog.

use std::io::{self, Write};

/// Write every registered rule, in registration order, with its
/// description.
pub fn list_rules(out: &mut impl Write) -> io::Result<()> {
    let catalog = rfx_rules::all_rules();
    let width = catalog.iter().map(|r| r.name().len()).max().unwrap_or(0);
    for rule in catalog {
        writeln!(out, "  {:width$}  {}", rule.name(), rule.description())?;
    }
    Ok(())
}
