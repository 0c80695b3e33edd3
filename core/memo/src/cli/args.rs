use crate::domain::MemoCommand;
use clap::builder::ArgAction;
use clap::value_parser;
use clap_complete::Shell;
use common::error::Error;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub help: bool,
    /// -f / --file: ファイル選択の問い合わせの代わりに使うパス
    pub file: Option<PathBuf>,
    /// --no-interactive: 問い合わせを出さない（-f が無ければ選択はキャンセル扱い）
    pub non_interactive: bool,
    /// -v / --verbose: ログを stderr にも出す
    pub verbose: bool,
    /// サブコマンド名（open / new / list / add / last）
    pub command: Option<String>,
    /// add の本文（単語を空白で結合する）
    pub text_args: Vec<String>,
}

/// 解析結果: 通常の Config / 補完スクリプト生成
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Config(Config),
    GenerateCompletion(Shell),
}

pub(crate) fn build_clap_command() -> clap::Command {
    clap::Command::new("memo")
        .about("Keep timestamped memos in a single plain-text file")
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
            clap::Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .help("Memo file to use instead of prompting for one")
                .global(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            clap::Arg::new("no-interactive")
                .long("no-interactive")
                .help("Do not prompt; without --file the file selection is treated as cancelled")
                .global(true)
                .action(ArgAction::SetTrue),
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
        .subcommand(subcommand("open", "Select an existing memo file and list its memos"))
        .subcommand(subcommand("new", "Choose where to save a new memo file"))
        .subcommand(subcommand("list", "Reload the memo file and list memos, newest first"))
        .subcommand(
            subcommand("add", "Append a memo and list memos")
                .arg(
                    clap::Arg::new("text")
                        .help("Memo text (words are joined with spaces)")
                        .num_args(1..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(subcommand("last", "Show the name of the last used memo file"))
}

// -h はグローバル引数として定義済みなので、サブコマンド側の自動ヘルプは無効にする
fn subcommand(name: &'static str, about: &'static str) -> clap::Command {
    clap::Command::new(name).about(about).disable_help_flag(true)
}

fn matches_to_config(matches: &clap::ArgMatches) -> Config {
    let (command, sub) = match matches.subcommand() {
        Some((name, sub)) => (Some(name.to_string()), Some(sub)),
        None => (None, None),
    };
    let flag = |id: &str| matches.get_flag(id) || sub.map(|s| s.get_flag(id)).unwrap_or(false);
    let file = sub
        .and_then(|s| s.get_one::<PathBuf>("file"))
        .or_else(|| matches.get_one::<PathBuf>("file"))
        .cloned();
    let text_args = sub
        .filter(|_| command.as_deref() == Some("add"))
        .and_then(|s| s.get_many::<String>("text"))
        .map(|i| i.cloned().collect())
        .unwrap_or_default();
    Config {
        help: flag("help"),
        file,
        non_interactive: flag("no-interactive"),
        verbose: flag("verbose"),
        command,
        text_args,
    }
}

/// コマンドラインを解析する。補完生成が要求された場合は ParseOutcome::GenerateCompletion を返す。
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

/// テスト用: 引数スライスから解析する
#[allow(dead_code)]
pub fn parse_args_from(args: &[String]) -> Result<Config, Error> {
    match parse_outcome_from(args)? {
        ParseOutcome::Config(c) => Ok(c),
        ParseOutcome::GenerateCompletion(_) => Err(Error::usage("--generate is not a command")),
    }
}

/// 補完スクリプトを標準出力に出力する。
pub fn print_completion(shell: Shell) {
    let mut cmd = build_clap_command();
    clap_complete::generate(shell, &mut cmd, "memo", &mut std::io::stdout());
}

/// Config を MemoCommand に変換する
pub fn config_to_command(config: Config) -> Result<MemoCommand, Error> {
    if config.help {
        return Ok(MemoCommand::Help);
    }
    match config.command.as_deref() {
        None => Ok(MemoCommand::Help),
        Some("open") => Ok(MemoCommand::Open),
        Some("new") => Ok(MemoCommand::New),
        Some("list") => Ok(MemoCommand::List),
        Some("last") => Ok(MemoCommand::Last),
        Some("add") => Ok(MemoCommand::Add {
            text: config.text_args.join(" "),
        }),
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
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.help);
        assert!(config.file.is_none());
        assert!(config.command.is_none());
        assert!(config.text_args.is_empty());
    }

    #[test]
    fn test_parse_add_with_global_file_before_subcommand() {
        let config = parse_args_from(&args(&["memo", "-f", "notes.md", "add", "Buy", "milk"])).unwrap();
        assert_eq!(config.file, Some(PathBuf::from("notes.md")));
        assert_eq!(config.command.as_deref(), Some("add"));
        assert_eq!(
            config_to_command(config).unwrap(),
            MemoCommand::Add {
                text: "Buy milk".to_string()
            }
        );
    }

    #[test]
    fn test_parse_file_after_subcommand() {
        let config = parse_args_from(&args(&["memo", "list", "--file", "a.md", "-v"])).unwrap();
        assert_eq!(config.file, Some(PathBuf::from("a.md")));
        assert!(config.verbose);
        assert_eq!(config_to_command(config).unwrap(), MemoCommand::List);
    }

    #[test]
    fn test_parse_add_text_with_leading_hyphen() {
        let config = parse_args_from(&args(&["memo", "add", "-", "dash", "first"])).unwrap();
        assert_eq!(config.text_args, vec!["-", "dash", "first"]);
    }

    #[test]
    fn test_parse_no_command_is_help() {
        let config = parse_args_from(&args(&["memo"])).unwrap();
        assert_eq!(config_to_command(config).unwrap(), MemoCommand::Help);
        let config = parse_args_from(&args(&["memo", "open", "-h"])).unwrap();
        assert!(config.help);
    }

    #[test]
    fn test_parse_other_commands() {
        for (name, expected) in [
            ("open", MemoCommand::Open),
            ("new", MemoCommand::New),
            ("last", MemoCommand::Last),
        ] {
            let config = parse_args_from(&args(&["memo", name, "--no-interactive"])).unwrap();
            assert!(config.non_interactive);
            assert_eq!(config_to_command(config).unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_unknown_subcommand_is_usage_error() {
        let err = parse_args_from(&args(&["memo", "delete"])).unwrap_err();
        assert!(err.is_usage());
        assert_eq!(err.exit_code(), 64);
    }

    #[test]
    fn test_parse_generate() {
        let outcome = parse_outcome_from(&args(&["memo", "--generate", "bash"])).unwrap();
        assert!(matches!(outcome, ParseOutcome::GenerateCompletion(Shell::Bash)));
    }
}
