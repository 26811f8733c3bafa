//! watchlog - Entry Point

use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use watchlog::model::{AppError, RuleError};
use watchlog::rules::{RuleEngine, StreamSelector};
use watchlog::view::constants::FATAL_EXIT_STATUS;
use watchlog::view::{ColorConfig, ViewerOptions};

/// Run a command and watch its output with recency-colored timestamps
#[derive(Parser, Debug)]
#[command(name = "watchlog")]
#[command(version)]
#[command(about = "Run a command and watch its stdout and stderr with recency-colored timestamps")]
pub struct Args {
    /// Rewrite rules for both streams: "pattern:replacement[,pattern:replacement...]"
    #[arg(short = 'g', long = "gsub", value_name = "RULESPEC")]
    pub gsub: Vec<String>,

    /// Rewrite rules applied to stdout only
    #[arg(long, value_name = "RULESPEC")]
    pub gsub_out: Vec<String>,

    /// Rewrite rules applied to stderr only
    #[arg(long, value_name = "RULESPEC")]
    pub gsub_err: Vec<String>,

    /// Redraw interval in milliseconds when no output arrives
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,

    /// Exit with the command's status when it ends the session
    #[arg(long)]
    pub exit_code: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the diagnostics log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Command to run, followed by its arguments
    #[arg(
        required = true,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "COMMAND"
    )]
    pub command: Vec<String>,
}

/// Options that consume the next argument as their value.
const VALUE_FLAGS: &[&str] = &[
    "-g",
    "--gsub",
    "--gsub-out",
    "--gsub-err",
    "--tick-ms",
    "--config",
    "--log-file",
];

/// Rewrite the single-dash `-gsub` spelling to `--gsub`.
///
/// Only options in front of the command are touched; the command's own
/// arguments pass through verbatim.
pub fn normalize_legacy_flags(args: Vec<OsString>) -> Vec<OsString> {
    let mut normalized = Vec::with_capacity(args.len());
    let mut iter = args.into_iter();
    normalized.extend(iter.next());

    let mut expect_value = false;
    while let Some(arg) = iter.next() {
        if expect_value {
            expect_value = false;
            normalized.push(arg);
            continue;
        }

        let is_option = arg
            .to_str()
            .is_some_and(|text| text != "--" && text.starts_with('-'));
        if !is_option {
            // The command starts here
            normalized.push(arg);
            normalized.extend(iter.by_ref());
            break;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };

        if text == "-gsub" {
            normalized.push(OsString::from("--gsub"));
            expect_value = true;
        } else if let Some(value) = text.strip_prefix("-gsub=") {
            normalized.push(OsString::from(format!("--gsub={value}")));
        } else {
            expect_value = VALUE_FLAGS.contains(&text);
            normalized.push(arg);
        }
    }

    normalized
}

/// Compile every rule flag, both-stream rules first.
pub fn build_rules(args: &Args) -> Result<RuleEngine, RuleError> {
    let mut rules = RuleEngine::new();

    for spec in &args.gsub {
        rules.add_spec(spec, StreamSelector::Both)?;
    }
    for spec in &args.gsub_out {
        rules.add_spec(spec, StreamSelector::Out)?;
    }
    for spec in &args.gsub_err {
        rules.add_spec(spec, StreamSelector::Err)?;
    }

    Ok(rules)
}

fn run(args: Args) -> Result<ExitCode, AppError> {
    // Load configuration with full precedence chain:
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = watchlog::config::load_config_with_precedence(args.config.clone())?;
        let merged = watchlog::config::merge_config(config_file);
        let with_env = watchlog::config::apply_env_overrides(merged);

        // Boolean flags only override when explicitly set
        let no_color_override = args.no_color.then_some(true);
        let exit_code_override = args.exit_code.then_some(true);

        watchlog::config::apply_cli_overrides(
            with_env,
            args.tick_ms,
            no_color_override,
            exit_code_override,
            args.log_file.clone(),
        )
    };

    // Bad rules are reported before anything touches the filesystem
    let rules = build_rules(&args)?;

    watchlog::logging::init(&config.log_file_path)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );
    info!(
        stdout_rules = rules.rule_count(watchlog::model::Source::Out),
        stderr_rules = rules.rule_count(watchlog::model::Source::Err),
        "Rules compiled"
    );

    let options = ViewerOptions {
        tick_interval: config.tick_interval,
        colors: ColorConfig::from_env_and_args(config.no_color),
    };

    let stop = watchlog::view::run(&args.command, rules, options)?;

    Ok(ExitCode::from(stop.exit_status(config.propagate_exit_code)))
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_legacy_flags(std::env::args_os().collect()));

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            watchlog::view::restore_terminal();
            eprintln!("watchlog: {err}");
            ExitCode::from(FATAL_EXIT_STATUS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    fn parse(args: &[&str]) -> Args {
        Args::parse_from(normalize_legacy_flags(os_args(args)))
    }

    #[test]
    fn test_help_does_not_error() {
        let result = Args::try_parse_from(["watchlog", "--help"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_version_does_not_error() {
        let result = Args::try_parse_from(["watchlog", "--version"]);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_command_is_required() {
        let result = Args::try_parse_from(["watchlog"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_command_only_defaults() {
        let args = parse(&["watchlog", "make"]);
        assert_eq!(args.command, vec!["make"]);
        assert!(args.gsub.is_empty());
        assert!(args.gsub_out.is_empty());
        assert!(args.gsub_err.is_empty());
        assert_eq!(args.tick_ms, None);
        assert!(!args.no_color);
        assert!(!args.exit_code);
        assert_eq!(args.config, None);
        assert_eq!(args.log_file, None);
    }

    #[test]
    fn test_command_keeps_its_own_flags() {
        let args = parse(&["watchlog", "ls", "-la", "--color=never"]);
        assert_eq!(args.command, vec!["ls", "-la", "--color=never"]);
    }

    #[test]
    fn test_double_dash_separates_command() {
        let args = parse(&["watchlog", "--no-color", "--", "-weird-program", "x"]);
        assert!(args.no_color);
        assert_eq!(args.command, vec!["-weird-program", "x"]);
    }

    #[test]
    fn test_gsub_short_and_long_are_repeatable() {
        let args = parse(&["watchlog", "-g", "a:b", "--gsub", "c:d", "cmd"]);
        assert_eq!(args.gsub, vec!["a:b", "c:d"]);
        assert_eq!(args.command, vec!["cmd"]);
    }

    #[test]
    fn test_legacy_single_dash_gsub() {
        let args = parse(&["watchlog", "-gsub", r"\[.*\]:[tag]", "tail", "-f", "x.log"]);
        assert_eq!(args.gsub, vec![r"\[.*\]:[tag]"]);
        assert_eq!(args.command, vec!["tail", "-f", "x.log"]);
    }

    #[test]
    fn test_legacy_gsub_with_equals() {
        let args = parse(&["watchlog", "-gsub=foo:bar", "cmd"]);
        assert_eq!(args.gsub, vec!["foo:bar"]);
    }

    #[test]
    fn test_legacy_spelling_inside_command_is_untouched() {
        let normalized = normalize_legacy_flags(os_args(&["watchlog", "awk", "-gsub"]));
        assert_eq!(normalized, os_args(&["watchlog", "awk", "-gsub"]));
    }

    #[test]
    fn test_legacy_spelling_as_flag_value_is_untouched() {
        let normalized =
            normalize_legacy_flags(os_args(&["watchlog", "--gsub", "-gsub", "cmd"]));
        assert_eq!(normalized, os_args(&["watchlog", "--gsub", "-gsub", "cmd"]));
    }

    #[test]
    fn test_per_stream_rules_and_options() {
        let args = parse(&[
            "watchlog",
            "--gsub-out",
            "x:y",
            "--gsub-err",
            "e:f",
            "--tick-ms",
            "250",
            "--exit-code",
            "--config",
            "/custom/config.toml",
            "--log-file",
            "/tmp/w.log",
            "cargo",
            "build",
        ]);
        assert_eq!(args.gsub_out, vec!["x:y"]);
        assert_eq!(args.gsub_err, vec!["e:f"]);
        assert_eq!(args.tick_ms, Some(250));
        assert!(args.exit_code);
        assert_eq!(args.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/w.log")));
        assert_eq!(args.command, vec!["cargo", "build"]);
    }

    #[test]
    fn test_tick_ms_rejects_non_numbers() {
        let result = Args::try_parse_from(["watchlog", "--tick-ms", "soon", "cmd"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_build_rules_orders_both_then_out_then_err() {
        let args = parse(&[
            "watchlog",
            "--gsub-err",
            "3:three",
            "--gsub-out",
            "2:two",
            "-g",
            "1:one",
            "cmd",
        ]);

        let rules = build_rules(&args).unwrap();
        let patterns: Vec<&str> = rules.rules().iter().map(|r| r.pattern()).collect();

        assert_eq!(patterns, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_build_rules_reports_bad_pattern() {
        let args = parse(&["watchlog", "-g", "(unclosed:x", "cmd"]);

        let err = build_rules(&args).unwrap_err();

        assert!(err.to_string().contains("can't parse <<(unclosed>>"));
    }
}
