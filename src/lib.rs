//! High-utility sequential rule mining.
//!
//! Sequences of utility-annotated items are folded into a prefix tree that is
//! pruned against a minimum utility while it is built. Rules are then grown
//! from the surviving tree, one per edge of a branching node or one per chain
//! of single children.

extern crate indexmap;
#[macro_use]
extern crate log;
extern crate once_cell;
extern crate rayon;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;
extern crate thiserror;

#[cfg(test)]
extern crate tempfile;

pub mod config;
pub mod error;
pub mod io;
mod rules;
mod sequence;
mod utility_tree;

use std::time::{Duration, Instant};

pub use config::Config;
pub use error::{Error, Result};
pub use io::{append_execution_log, parse_sequences, read_sequences, RuleWriter};
pub use rules::{generate_rules, Rule, RuleSink};
pub use sequence::{Item, ItemId, ParseError, Sequence, Utility};
pub use utility_tree::{TreeNode, TreeStats, UtilityTree};

/// What a finished run produced.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub sequences: usize,
    pub tree: TreeStats,
    pub rules: usize,
    /// Tree construction plus rule generation, input parsing excluded.
    pub elapsed: Duration,
}

/// Reads the dataset, mines it and writes rules and the execution log as the
/// config says.
///
/// Input and output files are opened before any tree work starts, so a bad
/// path fails the run early.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;

    let sequences = read_sequences(&config.input)?;
    let mut writer = RuleWriter::create(&config.output, config.echo_rules)?;

    let start = Instant::now();
    let tree = UtilityTree::build(config.min_utility, &sequences);
    tree.grow(&mut writer).map_err(Error::io("write", &config.output))?;
    let elapsed = start.elapsed();

    let rules = writer.written();
    writer.finish().map_err(Error::io("write", &config.output))?;
    info!("wrote {} rules to {}", rules, config.output.display());

    append_execution_log(&config.execution_log, config.min_utility, elapsed)?;

    Ok(RunSummary {
        sequences: sequences.len(),
        tree: tree.stats(),
        rules,
        elapsed,
    })
}
