//! Compilation engine.
//!
//! Turning a program into rules is a short pipeline, applied line by line:
//!
//! ```text
//! raw line ── normalize_line ──┐                    (normalize.rs)
//!              full-width → ASCII digits, trim
//!                              │
//!                              v
//!                     Compiler::step               (compiler.rs)
//!                       - header?  open block      (loop_block.rs)
//!                       - おわり?  flush block, recompile body N times
//!                       - in block: buffer line
//!                       - otherwise classify        (classify.rs)
//!                              │
//!                              v
//!                         Vec<Rule>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `normalize.rs`: digit normalization and trimming.
//! - `classify.rs`: phrase matching against the dictionary and priority
//!   selection of the winning condition/action tags.
//! - `loop_block.rs`: recognition of the repeat header and terminator.
//! - `compiler.rs`: the two-mode state machine and loop-body expansion.
//! - `trace.rs`: optional per-line trace for verbose compiles.
//!
//! ## Debugging
//!
//! Every line decision is emitted as a `tracing` event at `debug` level and
//! every classification at `trace` level. The `kotogram` binary prints them
//! when run with `--debug` or with `KOTOGRAM_DEBUG_RULES=1`.

#[path = "engine/classify.rs"]
mod classify;
#[path = "engine/compiler.rs"]
mod compiler;
#[path = "engine/loop_block.rs"]
mod loop_block;
#[path = "engine/normalize.rs"]
mod normalize;
#[path = "engine/trace.rs"]
mod trace;


pub use classify::{ActionSet, ConditionSet};
pub(crate) use compiler::Compiler;
pub use normalize::normalize_digits;
pub use trace::{LineOutcome, LineTrace, UnterminatedLoop};
