use crate::dictionary::Dictionary;
use crate::engine;
use crate::Rule;
use std::time::Duration;

pub use crate::engine::{LineOutcome, LineTrace, UnterminatedLoop};

/// Options that affect compilation.
///
/// The defaults give the plain behaviour: every repeat count is honoured as
/// written.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Upper bound for a repeat block's count. Larger counts are clamped to
    /// it. Useful when a game runs untrusted programs (`99999かい くりかえす`).
    pub max_repeat: Option<u32>,
}

/// Additional details returned by [`compile_verbose`] and
/// [`compile_verbose_with`].
#[derive(Debug, Clone)]
pub struct CompileDetails {
    /// One entry per source line, in order.
    pub lines: Vec<LineTrace>,
    /// Set when the program ended inside a repeat block.
    pub unterminated_loop: Option<UnterminatedLoop>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl CompileDetails {
    /// Lines that named no action and were dropped.
    pub fn dropped(&self) -> impl Iterator<Item = &LineTrace> {
        self.lines.iter().filter(|l| matches!(l.outcome, LineOutcome::Dropped { .. }))
    }
}

/// Result from [`compile_verbose`] and [`compile_verbose_with`].
#[derive(Debug, Clone)]
pub struct CompileResultVerbose {
    pub rules: Vec<Rule>,
    pub details: CompileDetails,
}

/// Compile `lines` against `dict` with default [`Options`].
///
/// Never fails: unusable lines are dropped, an unterminated repeat block is
/// discarded, and an unparseable count repeats zero times.
///
/// # Example
/// ```
/// use kotogram::{ActionTag, ConditionTag, Dictionary, Rule, compile};
///
/// let dict = Dictionary::builtin();
/// let rules = compile(&["かべ じゃんぷ", "ただの文"], &dict);
/// assert_eq!(rules, vec![Rule::when(ConditionTag::Wall, ActionTag::Jump)]);
/// ```
pub fn compile<S: AsRef<str>>(lines: &[S], dict: &Dictionary) -> Vec<Rule> {
    compile_with(lines, dict, &Options::default())
}

/// Compile `lines` against `dict` using `options`.
pub fn compile_with<S: AsRef<str>>(lines: &[S], dict: &Dictionary, options: &Options) -> Vec<Rule> {
    engine::Compiler::new(dict, options).run(lines)
}

/// Compile with default [`Options`] and return a per-line trace.
pub fn compile_verbose<S: AsRef<str>>(lines: &[S], dict: &Dictionary) -> CompileResultVerbose {
    compile_verbose_with(lines, dict, &Options::default())
}

/// Compile and also return a per-line trace.
///
/// The rules are exactly those [`compile_with`] returns; the trace only
/// explains them. The default path does not allocate the trace.
pub fn compile_verbose_with<S: AsRef<str>>(lines: &[S], dict: &Dictionary, options: &Options) -> CompileResultVerbose {
    let run = engine::Compiler::new(dict, options).run_with_trace(lines);

    let details = CompileDetails { lines: run.lines, unterminated_loop: run.unterminated_loop, elapsed: run.elapsed };
    CompileResultVerbose { rules: run.rules, details }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionTag, ConditionTag};

    fn dict() -> Dictionary {
        Dictionary::builder()
            .condition(ConditionTag::Wall, ["かべ"])
            .action(ActionTag::Jump, ["じゃんぷ"])
            .action(ActionTag::Crouch, ["しゃがむ"])
            .build()
    }

    #[test]
    fn compile_accepts_owned_lines() {
        let text = String::from("かべ じゃんぷ\nしゃがむ\n");
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        assert_eq!(
            compile(&lines, &dict()),
            vec![Rule::when(ConditionTag::Wall, ActionTag::Jump), Rule::always(ActionTag::Crouch)]
        );
    }

    #[test]
    fn verbose_rules_match_plain_rules() {
        let programs: Vec<Vec<&str>> = vec![
            vec!["かべ じゃんぷ"],
            vec!["3かい くりかえす", "かべ じゃんぷ", "おわり", "しゃがむ"],
            vec!["2かい くりかえす", "かべ じゃんぷ"],
            vec!["かべ", "", "ただの文"],
        ];
        let opts = Options { max_repeat: Some(2) };

        for program in programs {
            let plain = compile_with(&program, &dict(), &opts);
            let verbose = compile_verbose_with(&program, &dict(), &opts);
            assert_eq!(plain, verbose.rules, "program {:?}", program);
            assert_eq!(verbose.details.lines.len(), program.len());
        }
    }

    #[test]
    fn verbose_lists_dropped_lines() {
        let res = compile_verbose(&["かべ", "かべ じゃんぷ", "ただの文"], &dict());
        let dropped: Vec<usize> = res.details.dropped().map(|l| l.index).collect();
        assert_eq!(dropped, vec![0, 2]);
        assert!(res.details.unterminated_loop.is_none());
    }

    #[test]
    fn empty_program_compiles_to_nothing() {
        let empty: [&str; 0] = [];
        assert!(compile(&empty, &dict()).is_empty());
        assert!(compile(&["", "  "], &Dictionary::new()).is_empty());
    }
}
