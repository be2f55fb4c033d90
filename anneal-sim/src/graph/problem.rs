//! Plain-text problem files.
//!
//! One interaction per line as `i j J`. `i == j` is a linear bias on spin `i`;
//! an off-diagonal pair is listed once and entered into both spins' lists.
//! `#` starts a comment, blank lines are skipped. The spin count is one past
//! the largest index seen; indices must be below [`MAX_SPINS`].
//!
//! ```text
//! # 3-spin frustrated triangle with a bias on spin 0
//! 0 1 1.0
//! 1 2 1.0
//! 0 2 1.0
//! 0 0 -0.25
//! ```

use std::path::Path;

use tracing::debug;

use crate::error::{AnnealError, AnnealResult};
use crate::graph::CouplingGraph;

/// Upper bound (exclusive) on spin indices in a problem file.
pub const MAX_SPINS: usize = 1 << 24;

/// Parse problem text into a coupling graph.
pub fn parse_problem(text: &str) -> AnnealResult<CouplingGraph> {
    let mut terms: Vec<(usize, usize, f32)> = Vec::new();

    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let parse_err = |msg: String| AnnealError::Parse {
            line: lineno + 1,
            msg,
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 3 {
            return Err(parse_err(format!(
                "expected 'i j J', found {} fields",
                fields.len()
            )));
        }
        let i: usize = fields[0]
            .parse()
            .map_err(|_| parse_err(format!("invalid spin index '{}'", fields[0])))?;
        let j: usize = fields[1]
            .parse()
            .map_err(|_| parse_err(format!("invalid spin index '{}'", fields[1])))?;
        if let Some(&big) = [i, j].iter().find(|&&k| k >= MAX_SPINS) {
            return Err(parse_err(format!(
                "spin index {big} exceeds the limit of {MAX_SPINS} spins"
            )));
        }
        let c: f32 = fields[2]
            .parse()
            .map_err(|_| parse_err(format!("invalid coupling '{}'", fields[2])))?;
        if !c.is_finite() {
            return Err(parse_err(format!("coupling must be finite, got {c}")));
        }

        terms.push((i, j, c));
    }

    let n_spins = terms
        .iter()
        .map(|&(i, j, _)| i.max(j) + 1)
        .max()
        .ok_or(AnnealError::EmptyGraph)?;

    let mut lists: Vec<Vec<(usize, f32)>> = vec![Vec::new(); n_spins];
    for (i, j, c) in terms {
        lists[i].push((j, c));
        if i != j {
            lists[j].push((i, c));
        }
    }

    let graph = CouplingGraph::from_adjacency(lists)?;
    debug!(n_spins, degree = graph.degree(), "parsed problem");
    Ok(graph)
}

/// Read and parse a problem file.
pub fn read_problem(path: impl AsRef<Path>) -> AnnealResult<CouplingGraph> {
    let text = std::fs::read_to_string(path)?;
    parse_problem(&text)
}
