mod debug_report;

use kotogram::{Dictionary, DirectoryProvider, FallbackProvider, Options, compile_verbose_with};
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

const DEBUG_ENV: &str = "KOTOGRAM_DEBUG_RULES";

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    if config.debug {
        tracing_subscriber::fmt().with_max_level(tracing::Level::TRACE).with_writer(io::stderr).init();
    }

    let dict = match &config.dictionary {
        Some(dir) => FallbackProvider::new(DirectoryProvider::new(dir)).load_or_builtin(),
        None => Dictionary::builtin(),
    };

    let lines: Vec<&str> = config.input.lines().collect();
    let opts = Options { max_repeat: config.max_repeat };
    let res = compile_verbose_with(&lines, &dict, &opts);

    if config.json {
        match serde_json::to_string_pretty(&res.rules) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: failed to encode rules: {err}");
                std::process::exit(1);
            }
        }
    } else {
        debug_report::print_run(&res.rules, &res.details, config.color);
    }
}

struct CliConfig {
    input: String,
    dictionary: Option<PathBuf>,
    max_repeat: Option<u32>,
    json: bool,
    color: bool,
    debug: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut dictionary: Option<PathBuf> = None;
    let mut max_repeat: Option<u32> = None;
    let mut json = false;
    let mut color = io::stdout().is_terminal();
    let mut debug = std::env::var_os(DEBUG_ENV).is_some();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("kotogram {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--json" => json = true,
            "--debug" => debug = true,
            "--dictionary" | "-d" => {
                let value = args.next().ok_or_else(|| "error: --dictionary expects a value".to_string())?;
                dictionary = Some(PathBuf::from(value));
            }
            "--max-repeat" => {
                let value = args.next().ok_or_else(|| "error: --max-repeat expects a value".to_string())?;
                max_repeat = Some(parse_max_repeat(&value)?);
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                set_input(&mut input, value)?;
            }
            "--file" | "-f" => {
                let value = args.next().ok_or_else(|| "error: --file expects a value".to_string())?;
                set_input(&mut input, read_file_input(&value)?)?;
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join("\n");
                if !rest.trim().is_empty() {
                    set_input(&mut input, rest)?;
                }
                break;
            }
            _ if arg.starts_with("--dictionary=") => {
                dictionary = Some(PathBuf::from(arg.trim_start_matches("--dictionary=")));
            }
            _ if arg.starts_with("--max-repeat=") => {
                max_repeat = Some(parse_max_repeat(arg.trim_start_matches("--max-repeat="))?);
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                set_input(&mut input, value.to_string())?;
            }
            _ if arg.starts_with("--file=") => {
                let value = arg.trim_start_matches("--file=");
                set_input(&mut input, read_file_input(value)?)?;
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                // Each remaining argument is one program line.
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join("\n");
                set_input(&mut input, rest)?;
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, dictionary, max_repeat, json, color, debug })
}

fn set_input(input: &mut Option<String>, value: String) -> Result<(), String> {
    if input.is_some() {
        return Err("error: input provided multiple times".to_string());
    }
    *input = Some(value);
    Ok(())
}

fn parse_max_repeat(value: &str) -> Result<u32, String> {
    value.parse::<u32>().map_err(|_| format!("error: invalid --max-repeat '{value}' (expected a non-negative integer)"))
}

fn read_file_input(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|err| format!("error: failed to read '{path}': {err}"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "kotogram {version}

Compile a children's program into game rules.

Usage:
  kotogram [OPTIONS] [--] <line...>
  kotogram [OPTIONS] --input <text>
  kotogram [OPTIONS] --file <path>

Each positional argument is one program line. Text given with --input or
--file, or read from stdin, is split into lines.

Options:
  -i, --input <text>         Program text.
  -f, --file <path>          Read the program from a file.
  -d, --dictionary <dir>     Directory holding conditions.json and actions.json.
                             Falls back to the built-in phrases when unreadable.
  --max-repeat <n>           Clamp every repeat count to at most <n>.
  --json                     Print the compiled rules as JSON.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  --debug                    Log every compiler decision to stderr
                             (same as setting {debug_env}=1).
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Exit codes:
  0  Success.
  1  Internal error.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        debug_env = DEBUG_ENV
    )
}
