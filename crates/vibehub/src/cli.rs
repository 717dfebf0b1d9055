#![forbid(unsafe_code)]

//! Command-line argument parsing.
//!
//! Arguments are parsed by hand with `--flag=value` syntax. Every option can
//! also be set through a `VIBEHUB_*` environment variable; explicit flags
//! win over the environment, which wins over defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
vibehub - terminal gallery of reusable AI prompts

USAGE:
    vibehub [OPTIONS]

OPTIONS:
    --catalog=PATH       Load prompts from a JSON file instead of the built-in set
    --fps=N              Frame rate of the background animation (default: 30, 1..=120)
    --seed=N             Seed for boot-sequence jitter (default: time based)
    --skip-boot          Start directly in the gallery
    --no-background      Disable the animated background
    --log-file=PATH      Write tracing output to PATH
    --exit-after-ms=N    Quit automatically after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

KEYBINDINGS:
    /                    Search (Enter/Esc to leave, Ctrl+U to clear)
    Tab                  Switch focus between directory and grid
    Arrows               Move within the focused pane
    Enter                Open the selected prompt
    Home                 Show all files
    c / y                Copy the open prompt
    Esc / x              Close the open prompt
    q / Ctrl+C           Quit

ENVIRONMENT VARIABLES:
    VIBEHUB_CATALOG          Override --catalog
    VIBEHUB_FPS              Override --fps
    VIBEHUB_SEED             Override --seed
    VIBEHUB_SKIP_BOOT        Set to 1 to skip the boot sequence
    VIBEHUB_NO_BACKGROUND    Set to 1 to disable the background
    VIBEHUB_LOG_FILE         Override --log-file
    VIBEHUB_EXIT_AFTER_MS    Override --exit-after-ms
    VIBEHUB_LOG              Log filter (default: info)";

pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 120;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Catalog file; the embedded set when `None`.
    pub catalog: Option<PathBuf>,
    /// Background frame rate.
    pub fps: u32,
    /// Boot jitter seed; derived from the clock when `None`.
    pub seed: Option<u64>,
    pub skip_boot: bool,
    pub no_background: bool,
    pub log_file: Option<PathBuf>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            catalog: None,
            fps: 30,
            seed: None,
            skip_boot: false,
            no_background: false,
            log_file: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

/// Argument errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    InvalidValue { flag: &'static str, value: String },
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

fn truthy(val: &str) -> bool {
    matches!(val, "1" | "true" | "yes" | "on")
}

fn parse_fps(flag: &'static str, val: &str) -> Result<u32, CliError> {
    match val.parse::<u32>() {
        Ok(n) if (MIN_FPS..=MAX_FPS).contains(&n) => Ok(n),
        _ => Err(CliError::InvalidValue {
            flag,
            value: val.to_string(),
        }),
    }
}

fn parse_num<T: std::str::FromStr>(flag: &'static str, val: &str) -> Result<T, CliError> {
    val.parse().map_err(|_| CliError::InvalidValue {
        flag,
        value: val.to_string(),
    })
}

impl Opts {
    /// Parse the process arguments and environment, printing help, version
    /// or errors and exiting where appropriate.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("vibehub {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with environment lookups going through `var`.
    ///
    /// Malformed environment values are ignored; malformed flags are errors.
    pub fn parse_from<I, S, F>(args: I, var: F) -> Result<Command, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = var("VIBEHUB_CATALOG") {
            opts.catalog = Some(PathBuf::from(val));
        }
        if let Some(val) = var("VIBEHUB_FPS")
            && let Ok(n) = parse_fps("VIBEHUB_FPS", &val)
        {
            opts.fps = n;
        }
        if let Some(val) = var("VIBEHUB_SEED")
            && let Ok(n) = val.parse()
        {
            opts.seed = Some(n);
        }
        if let Some(val) = var("VIBEHUB_SKIP_BOOT") {
            opts.skip_boot = truthy(&val);
        }
        if let Some(val) = var("VIBEHUB_NO_BACKGROUND") {
            opts.no_background = truthy(&val);
        }
        if let Some(val) = var("VIBEHUB_LOG_FILE") {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = var("VIBEHUB_EXIT_AFTER_MS")
            && let Ok(n) = val.parse()
        {
            opts.exit_after_ms = n;
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--skip-boot" => opts.skip_boot = true,
                "--no-background" => opts.no_background = true,
                other => {
                    if let Some(val) = other.strip_prefix("--catalog=") {
                        opts.catalog = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--fps=") {
                        opts.fps = parse_fps("--fps", val)?;
                    } else if let Some(val) = other.strip_prefix("--seed=") {
                        opts.seed = Some(parse_num("--seed", val)?);
                    } else if let Some(val) = other.strip_prefix("--log-file=") {
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = parse_num("--exit-after-ms", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn parse(args: &[&str], vars: &[(&str, &str)]) -> Result<Command, CliError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Opts::parse_from(args.iter().copied(), |k| vars.get(k).cloned())
    }

    fn run(args: &[&str], vars: &[(&str, &str)]) -> Opts {
        match parse(args, vars) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = run(&[], &[]);
        assert_eq!(opts, Opts::default());
        assert_eq!(opts.fps, 30);
        assert!(!opts.skip_boot);
        assert_eq!(opts.exit_after_ms, 0);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(
            &[
                "--catalog=prompts.json",
                "--fps=60",
                "--seed=42",
                "--skip-boot",
                "--no-background",
                "--log-file=/tmp/vibehub.log",
                "--exit-after-ms=1500",
            ],
            &[],
        );
        assert_eq!(opts.catalog, Some(PathBuf::from("prompts.json")));
        assert_eq!(opts.fps, 60);
        assert_eq!(opts.seed, Some(42));
        assert!(opts.skip_boot);
        assert!(opts.no_background);
        assert_eq!(opts.log_file, Some(PathBuf::from("/tmp/vibehub.log")));
        assert_eq!(opts.exit_after_ms, 1500);
    }

    #[test]
    fn flags_override_environment() {
        let opts = run(&["--fps=10"], &[("VIBEHUB_FPS", "90"), ("VIBEHUB_SEED", "7")]);
        assert_eq!(opts.fps, 10);
        assert_eq!(opts.seed, Some(7));
    }

    #[test]
    fn environment_toggles() {
        let opts = run(
            &[],
            &[("VIBEHUB_SKIP_BOOT", "1"), ("VIBEHUB_NO_BACKGROUND", "0")],
        );
        assert!(opts.skip_boot);
        assert!(!opts.no_background);
    }

    #[test]
    fn bad_environment_values_are_ignored() {
        let opts = run(&[], &[("VIBEHUB_FPS", "9000"), ("VIBEHUB_EXIT_AFTER_MS", "soon")]);
        assert_eq!(opts.fps, 30);
        assert_eq!(opts.exit_after_ms, 0);
    }

    #[test]
    fn fps_out_of_range_is_rejected() {
        assert_eq!(
            parse(&["--fps=0"], &[]),
            Err(CliError::InvalidValue {
                flag: "--fps",
                value: "0".into()
            })
        );
        assert!(parse(&["--fps=121"], &[]).is_err());
        assert!(parse(&["--fps=120"], &[]).is_ok());
    }

    #[test]
    fn unknown_argument_is_an_error() {
        let err = parse(&["--turbo"], &[]).unwrap_err();
        assert_eq!(err.to_string(), "Unknown argument: --turbo");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["--fps=nope", "-h"], &[]).ok(), None);
        assert_eq!(parse(&["-h", "--fps=nope"], &[]), Ok(Command::Help));
        assert_eq!(parse(&["--version"], &[]), Ok(Command::Version));
    }

    #[test]
    fn help_text_lists_env_vars() {
        assert!(HELP_TEXT.contains("VIBEHUB_FPS"));
        assert!(HELP_TEXT.contains("VIBEHUB_EXIT_AFTER_MS"));
        assert!(!VERSION.is_empty());
    }
}
