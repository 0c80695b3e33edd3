use crate::domain::CacheCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/";
pub const CACHE_NAME_ENV: &str = "SHELLCACHE_NAME";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// --cache-dir: スナップショットの保存先（省略時は <home>/cache）
    pub cache_dir: Option<PathBuf>,
    /// --base-url: マニフェストの相対エントリを解決する基準
    pub base_url: Option<String>,
    /// --cache-name: 版（省略時は SHELLCACHE_NAME、なければ既定値）
    pub cache_name: Option<String>,
    pub verbose: bool,
    /// サブコマンド名（install / activate / update / fetch / status）
    pub command: Option<String>,
    /// fetch の対象 URL
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

pub(crate) fn build_clap_command() -> clap::Command {
    clap::Command::new("shellcache")
        .about("Install, activate and serve the offline application shell cache")
        .disable_help_flag(true)
        .disable_help_subcommand(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("cache-dir")
                .long("cache-dir")
                .value_name("DIR")
                .help("Directory holding cache snapshots")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Scope URL that relative manifest entries resolve against")
                .global(true),
        )
        .arg(
            clap::Arg::new("cache-name")
                .long("cache-name")
                .value_name("NAME")
                .help("Cache version identifier (snapshot name)")
                .global(true),
        )
        .arg(
            clap::Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Emit logs to stderr (for troubleshooting)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("generate")
                .long("generate")
                .value_name("SHELL")
                .help("Generate shell completion script (bash, zsh, fish)")
                .value_parser(value_parser!(Shell)),
        )
        .subcommand(subcommand("install", "Fetch every shell resource into a new snapshot"))
        .subcommand(subcommand("activate", "Delete stale snapshots and take control of clients"))
        .subcommand(subcommand("update", "Install, then activate without waiting"))
        .subcommand(
            subcommand("fetch", "Serve one request cache-first and write the body to stdout")
                .arg(clap::Arg::new("url").help("Request URL").required(true)),
        )
        .subcommand(subcommand("status", "Show controller state and stored snapshots"))
}

fn subcommand(name: &'static str, about: &'static str) -> clap::Command {
    clap::Command::new(name).about(about).disable_help_flag(true)
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let (command, sub) = match matches.subcommand() {
        Some((name, sub)) => (Some(name.to_string()), Some(sub)),
        None => (None, None),
    };
    let flag = |id: &str| matches.get_flag(id) || sub.map(|s| s.get_flag(id)).unwrap_or(false);
    let string = |id: &str| {
        sub.and_then(|s| s.get_one::<String>(id))
            .or_else(|| matches.get_one::<String>(id))
            .cloned()
    };
    let cache_dir = sub
        .and_then(|s| s.get_one::<PathBuf>("cache-dir"))
        .or_else(|| matches.get_one::<PathBuf>("cache-dir"))
        .cloned();
    let url = sub
        .filter(|_| command.as_deref() == Some("fetch"))
        .and_then(|s| s.get_one::<String>("url"))
        .cloned();
    Config {
        help: flag("help"),
        cache_dir,
        base_url: string("base-url"),
        cache_name: string("cache-name"),
        verbose: flag("verbose"),
        command,
        url,
    }
}

pub fn parse_args() -> Result<ParseOutcome, Error> {
    let args: Vec<String> = std::env::args().collect();
    parse_outcome_from(&args)
}

fn parse_outcome_from(args: &[String]) -> Result<ParseOutcome, Error> {
    let matches = build_clap_command()
        .try_get_matches_from(args)
        .map_err(|e| Error::usage(e.to_string()))?;
    if let Some(&shell) = matches.get_one::<Shell>("generate") {
        return Ok(ParseOutcome::GenerateCompletion(shell));
    }
    Ok(ParseOutcome::Config(matches_to_config(&matches)))
}

#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    match parse_outcome_from(args)? {
        ParseOutcome::Config(c) => Ok(c),
        ParseOutcome::GenerateCompletion(_) => {
            Err(Error::usage("--generate is not valid in this context"))
        }
    }
}

pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "shellcache", &mut std::io::stdout());
}

/// 基準 URL を解析する（省略時は既定値）
pub fn base_url(config: &Config) -> Result<Url, Error> {
    let raw = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
    Url::parse(raw).map_err(|e| Error::invalid_argument(format!("Invalid base URL '{}': {}", raw, e)))
}

/// Config を CacheCommand に変換する。fetch の相対 URL は基準 URL から解決する。
pub fn config_to_command(config: &Config) -> Result<CacheCommand, Error> {
    if config.help {
        return Ok(CacheCommand::Help);
    }
    match config.command.as_deref() {
        None => Ok(CacheCommand::Help),
        Some("install") => Ok(CacheCommand::Install),
        Some("activate") => Ok(CacheCommand::Activate),
        Some("update") => Ok(CacheCommand::Update),
        Some("status") => Ok(CacheCommand::Status),
        Some("fetch") => {
            let raw = config
                .url
                .as_deref()
                .ok_or_else(|| Error::usage("fetch requires a URL"))?;
            let url = base_url(config)?
                .join(raw)
                .map_err(|e| Error::invalid_argument(format!("Invalid URL '{}': {}", raw, e)))?;
            Ok(CacheCommand::Fetch { url })
        }
        Some(other) => Err(Error::usage(format!("Unknown command: {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_command_is_help() {
        let config = parse_args_from(&args(&["shellcache"])).unwrap();
        assert_eq!(config_to_command(&config).unwrap(), CacheCommand::Help);
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let config = parse_args_from(&args(&[
            "shellcache",
            "update",
            "--cache-name",
            "handy-memo-cache-v2",
            "--cache-dir",
            "/tmp/cache",
            "-v",
        ]))
        .unwrap();
        assert_eq!(config.cache_name.as_deref(), Some("handy-memo-cache-v2"));
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cache")));
        assert!(config.verbose);
        assert_eq!(config_to_command(&config).unwrap(), CacheCommand::Update);
    }

    #[test]
    fn test_fetch_resolves_relative_url() {
        let config = parse_args_from(&args(&[
            "shellcache",
            "--base-url",
            "http://localhost:9000/app/",
            "fetch",
            "style.css",
        ]))
        .unwrap();
        match config_to_command(&config).unwrap() {
            CacheCommand::Fetch { url } => {
                assert_eq!(url.as_str(), "http://localhost:9000/app/style.css")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_fetch_without_url_is_usage_error() {
        let err = parse_args_from(&args(&["shellcache", "fetch"])).unwrap_err();
        assert!(err.is_usage());
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config {
            base_url: Some("not a url".to_string()),
            ..Config::default()
        };
        assert_eq!(base_url(&config).unwrap_err().exit_code(), 64);
    }

    #[test]
    fn test_generate_completion() {
        let outcome = parse_outcome_from(&args(&["shellcache", "--generate", "bash"])).unwrap();
        assert!(matches!(outcome, ParseOutcome::GenerateCompletion(Shell::Bash)));
    }
}
