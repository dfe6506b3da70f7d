//! Compile traces.
//!
//! The plain compile path records nothing. A verbose compile keeps one
//! [`LineTrace`] per source line so a parent or the CLI report can see why
//! a line did or did not turn into a rule. Traces never influence the rules
//! produced.

use super::classify::{ActionSet, ConditionSet};
use crate::{ConditionTag, Rule};
use std::time::Duration;

/// What the compiler did with one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Empty or whitespace-only; skipped.
    Blank,
    /// Compiled to a rule. The shadowed sets hold tags that also matched but
    /// lost on priority.
    Rule { rule: Rule, shadowed_conditions: ConditionSet, shadowed_actions: ActionSet },
    /// No action phrase found. `condition` is set when a trigger was
    /// recognized but had nothing to do.
    Dropped { condition: Option<ConditionTag> },
    /// Opened a repeat block.
    LoopStart { count: u32 },
    /// Stored in the open repeat block; compiled when the block closes.
    Buffered,
    /// Closed a repeat block. `produced` counts rules across all repetitions.
    LoopEnd { repetitions: u32, produced: usize },
}

/// Trace entry for one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTrace {
    /// Zero-based position in the program.
    pub index: usize,
    /// The line after digit normalization and trimming.
    pub text: String,
    pub outcome: LineOutcome,
}

/// A repeat block still open when the program ended. Its lines were
/// discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnterminatedLoop {
    /// Index of the header line.
    pub header: usize,
    /// Number of buffered body lines thrown away.
    pub discarded: usize,
}

/// Compiler output bundled with its trace.
#[derive(Debug, Clone)]
pub(crate) struct RunResult {
    pub rules: Vec<Rule>,
    pub lines: Vec<LineTrace>,
    pub unterminated_loop: Option<UnterminatedLoop>,
    pub elapsed: Duration,
}
