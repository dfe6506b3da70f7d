use kotogram::{CompileDetails, FailReason, LineOutcome, LineTrace, Rule};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_run(rules: &[Rule], details: &CompileDetails, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Compiling {} lines", details.lines.len()), ansi::CYAN)));

    println!("\n{}", palette.paint("━━━ Lines ━━━", ansi::GRAY));
    for line in &details.lines {
        println!("  {}", fmt_line(line, &palette));
    }

    if let Some(open) = &details.unterminated_loop {
        println!(
            "\n  {} {}",
            palette.paint("⚠", ansi::YELLOW),
            palette.paint(
                format!(
                    "repeat block opened on line {} was never closed with おわり ({} lines discarded)",
                    open.header + 1,
                    open.discarded
                ),
                ansi::YELLOW
            )
        );
    }

    println!("\n{}", palette.paint("━━━ Rules ━━━", ansi::GRAY));
    if rules.is_empty() {
        println!("{}", palette.dim("  No rules produced"));
        println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
        println!("  • No line contains an action phrase");
        println!("  • A repeat block has count 0 or was never closed");
        println!("  • The dictionary does not know the words used");
    } else {
        for (idx, rule) in rules.iter().enumerate() {
            println!("  {} {}", palette.paint(format!("[{}]", idx), ansi::GRAY), fmt_rule(rule, &palette));
        }
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!("  Total: {}", palette.paint(format!("{:?}", details.elapsed), ansi::GREEN));
    println!();
}

fn fmt_line(line: &LineTrace, palette: &ansi::Palette) -> String {
    let number = palette.paint(format!("{:>3}", line.index + 1), ansi::GRAY);
    let outcome = match &line.outcome {
        LineOutcome::Blank => return format!("{} {}", number, palette.dim("(blank)")),
        LineOutcome::Rule { rule, shadowed_conditions, shadowed_actions } => {
            let mut s = format!("{} {}", palette.paint("✓", ansi::GREEN), fmt_rule(rule, palette));
            let shadowed: Vec<String> = shadowed_conditions
                .tags()
                .into_iter()
                .map(|t| t.to_string())
                .chain(shadowed_actions.tags().into_iter().map(|t| t.to_string()))
                .collect();
            if !shadowed.is_empty() {
                s.push_str(&palette.dim(format!("  (outranked: {})", shadowed.join(", "))));
            }
            s
        }
        LineOutcome::Dropped { condition: Some(cond) } => {
            let mut s = palette.paint(format!("✗ dropped: '{}' has no action", cond), ansi::RED);
            if let Some(reason) = FailReason::for_condition(*cond) {
                s.push_str(&format!("\n      {} {}", palette.dim("hint:"), reason.default_hint()));
            }
            s
        }
        LineOutcome::Dropped { condition: None } => palette.paint("✗ dropped: no known phrase", ansi::RED),
        LineOutcome::LoopStart { count } => palette.paint(format!("↻ repeat {} times", count), ansi::BLUE),
        LineOutcome::Buffered => palette.dim("│ buffered"),
        LineOutcome::LoopEnd { repetitions, produced } => {
            palette.paint(format!("↻ end: {} passes, {} rules", repetitions, produced), ansi::BLUE)
        }
    };
    format!("{} {}  {}", number, palette.bold(&line.text), outcome)
}

fn fmt_rule(rule: &Rule, palette: &ansi::Palette) -> String {
    match rule.condition {
        Some(cond) => format!(
            "{} {} {}",
            palette.paint(cond.name(), ansi::YELLOW),
            palette.dim("→"),
            palette.bold(palette.paint(rule.action.name(), ansi::GREEN))
        ),
        None => format!(
            "{} {} {}",
            palette.dim("always"),
            palette.dim("→"),
            palette.bold(palette.paint(rule.action.name(), ansi::GREEN))
        ),
    }
}
