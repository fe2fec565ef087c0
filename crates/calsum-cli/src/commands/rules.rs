//! Rules command printing the effective rule list.
//!
//! The output is the JSON format accepted by `--rules`, so it doubles as a
//! starting point for a custom rule file.

use std::path::PathBuf;

use anyhow::Result;
use calsum_core::RuleSet;

use super::util::resolve_rules;
use crate::Config;

/// Serializes a rule set as a pretty JSON list.
pub fn format_rules(rules: &RuleSet) -> Result<String> {
    Ok(serde_json::to_string_pretty(&rules.to_serialized())?)
}

/// Runs the rules command.
pub fn run(rule_files: &[PathBuf], config: &Config) -> Result<()> {
    let rules = resolve_rules(rule_files, config)?;
    println!("{}", format_rules(&rules)?);
    Ok(())
}
