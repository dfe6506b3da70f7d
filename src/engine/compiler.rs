//! Program compiler.
//!
//! A single left-to-right pass over the program with two modes:
//!
//! ```text
//!            header "N かい くりかえす"
//!   Normal ─────────────────────────────▶ BufferingLoop
//!     ▲                                        │  other lines -> body buffer
//!     └──────────── "おわり": flush ◀──────────┘
//! ```
//!
//! - In `Normal`, every non-header line is classified and becomes a rule if
//!   it names an action.
//! - In `BufferingLoop`, lines are stored verbatim. A second header is just
//!   another body line; blocks do not nest.
//! - On flush, the body is compiled as its own program by a compiler with
//!   [`Nesting::LoopBody`], which has loop detection switched off, and the
//!   result is appended once per repetition.
//! - A block still open at the end of input is discarded.
//!
//! Nothing here can fail. Unusable input produces fewer rules.

use super::classify::Classification;
use super::loop_block::{is_terminator, parse_header};
use super::normalize::normalize_line;
use super::trace::{LineOutcome, LineTrace, RunResult, UnterminatedLoop};
use crate::dictionary::Dictionary;
use crate::{Options, Rule};
use std::time::Instant;

/// Whether loop headers are recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Nesting {
    /// Program as written by the user; headers open repeat blocks.
    TopLevel,
    /// Body of a repeat block; headers are ordinary text.
    LoopBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    BufferingLoop,
}

/// Pass state: current mode plus the open block, if any.
#[derive(Debug)]
struct LoopState {
    mode: Mode,
    /// Pending repetition count of the open block.
    count: u32,
    /// Index of the header line of the open block.
    header: usize,
    body: Vec<String>,
}

impl LoopState {
    fn new() -> Self {
        LoopState { mode: Mode::Normal, count: 0, header: 0, body: Vec::new() }
    }

    fn open(&mut self, header: usize, count: u32) {
        self.mode = Mode::BufferingLoop;
        self.count = count;
        self.header = header;
        self.body.clear();
    }

    /// Close the block, returning its count and body.
    fn close(&mut self) -> (u32, Vec<String>) {
        let count = std::mem::take(&mut self.count);
        let body = std::mem::take(&mut self.body);
        self.mode = Mode::Normal;
        (count, body)
    }
}

/// Compiles programs against one dictionary snapshot.
///
/// Usage: `Compiler::new(&dict, &options).run(&lines)`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Compiler<'a> {
    dict: &'a Dictionary,
    options: &'a Options,
    nesting: Nesting,
}

impl<'a> Compiler<'a> {
    pub fn new(dict: &'a Dictionary, options: &'a Options) -> Self {
        Compiler { dict, options, nesting: Nesting::TopLevel }
    }

    /// Compiler for the body of a repeat block.
    fn for_body(&self) -> Self {
        Compiler { nesting: Nesting::LoopBody, ..*self }
    }

    /// Compile `lines` into rules.
    pub fn run<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Rule> {
        self.compile(lines, None).0
    }

    /// Compile `lines`, recording a per-line trace and timing.
    pub fn run_with_trace<S: AsRef<str>>(&self, lines: &[S]) -> RunResult {
        let start = Instant::now();
        let mut trace = Vec::with_capacity(lines.len());
        let (rules, unterminated_loop) = self.compile(lines, Some(&mut trace));
        RunResult { rules, lines: trace, unterminated_loop, elapsed: start.elapsed() }
    }

    fn compile<S: AsRef<str>>(
        &self,
        lines: &[S],
        mut trace: Option<&mut Vec<LineTrace>>,
    ) -> (Vec<Rule>, Option<UnterminatedLoop>) {
        let mut rules = Vec::new();
        let mut state = LoopState::new();

        for (index, raw) in lines.iter().enumerate() {
            let line = normalize_line(raw.as_ref());

            let outcome = self.step(index, line.as_str(), &mut state, &mut rules);
            if let Some(trace) = trace.as_deref_mut() {
                trace.push(LineTrace { index, text: line, outcome });
            }
        }

        let unterminated = match state.mode {
            Mode::BufferingLoop => {
                tracing::debug!(
                    header = state.header,
                    discarded = state.body.len(),
                    "repeat block never closed, discarding body"
                );
                Some(UnterminatedLoop { header: state.header, discarded: state.body.len() })
            }
            Mode::Normal => None,
        };

        (rules, unterminated)
    }

    /// Advance the pass by one normalized line.
    fn step(&self, index: usize, line: &str, state: &mut LoopState, rules: &mut Vec<Rule>) -> LineOutcome {
        if line.is_empty() {
            return LineOutcome::Blank;
        }

        match state.mode {
            Mode::Normal => {
                if self.nesting == Nesting::TopLevel {
                    if let Some(count) = parse_header(line) {
                        let count = self.clamp_count(count);
                        tracing::debug!(index, count, "repeat block opened");
                        state.open(index, count);
                        return LineOutcome::LoopStart { count };
                    }
                }
                self.classify_into(index, line, rules)
            }
            Mode::BufferingLoop if is_terminator(line) => {
                let (count, body) = state.close();
                let before = rules.len();
                let body_compiler = self.for_body();
                for _ in 0..count {
                    rules.extend(body_compiler.run(body.as_slice()));
                }
                let produced = rules.len() - before;
                tracing::debug!(index, repetitions = count, produced, "repeat block closed");
                LineOutcome::LoopEnd { repetitions: count, produced }
            }
            Mode::BufferingLoop => {
                state.body.push(line.to_string());
                LineOutcome::Buffered
            }
        }
    }

    fn classify_into(&self, index: usize, line: &str, rules: &mut Vec<Rule>) -> LineOutcome {
        let classification = Classification::scan(line, self.dict);
        match classification.rule() {
            Some(rule) => {
                tracing::debug!(index, %rule, "line compiled");
                rules.push(rule);
                LineOutcome::Rule {
                    rule,
                    shadowed_conditions: classification.shadowed_conditions(),
                    shadowed_actions: classification.shadowed_actions(),
                }
            }
            None => {
                tracing::debug!(index, line, "no action phrase, line dropped");
                LineOutcome::Dropped { condition: classification.condition() }
            }
        }
    }

    fn clamp_count(&self, count: u32) -> u32 {
        match self.options.max_repeat {
            Some(cap) => count.min(cap),
            None => count,
        }
    }
}
