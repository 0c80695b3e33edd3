mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;


use std::process;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::render::{render_file_label, render_memos};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::MemoCommand;
use ports::inbound::UseCaseRunner;
use usecase::memo_store::{FileSelection, ReloadOutcome};
use wiring::{wire_memo, App};

/// Command をディスパッチする Runner（match は main レイヤーに集約）
struct Runner {
    app: App,
}

impl Runner {
    /// 既存ファイルを選ぶ。キャンセル時は Ok(false)。
    fn select(&mut self) -> Result<bool, Error> {
        match self.app.store.select_existing_file()? {
            FileSelection::Selected(name) => {
                println!("{}", render_file_label(Some(&name)));
                Ok(true)
            }
            FileSelection::Cancelled => Ok(false),
        }
    }

    fn print_memos(&self) {
        println!("{}", render_memos(&self.app.store.display_memos()));
    }
}

impl UseCaseRunner for Runner {
    fn run(&mut self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(config)?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name),
        );

        let result = match cmd {
            MemoCommand::Help => {
                print_help();
                Ok(0)
            }
            MemoCommand::Last => {
                let name = self.app.store.last_file_name();
                println!("Last used: {}", name.as_deref().unwrap_or("(none)"));
                Ok(0)
            }
            MemoCommand::Open => self.select().map(|selected| {
                if selected {
                    self.print_memos();
                }
                0
            }),
            MemoCommand::New => match self.app.store.create_new_file() {
                Ok(FileSelection::Selected(name)) => {
                    println!("{}", render_file_label(Some(&name)));
                    self.print_memos();
                    Ok(0)
                }
                Ok(FileSelection::Cancelled) => Ok(0),
                Err(e) => Err(e),
            },
            MemoCommand::List => self.select().and_then(|selected| {
                if !selected {
                    return Ok(0);
                }
                match self.app.store.reload()? {
                    ReloadOutcome::NoFileSelected => println!("{}", render_file_label(None)),
                    ReloadOutcome::Loaded { .. } => self.print_memos(),
                }
                Ok(0)
            }),
            MemoCommand::Add { text } => self.select().and_then(|selected| {
                if !selected {
                    return Ok(0);
                }
                self.app.store.add_memo(&text)?;
                self.print_memos();
                Ok(0)
            }),
        };

        let code = match &result {
            Ok(code) => *code,
            Err(e) => e.exit_code(),
        };
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("exit_code", code),
        );
        if let Err(ref e) = result {
            let _ = self.app.logger.log(
                &LogRecord::new(LogLevel::Error, e.to_string())
                    .layer("cli")
                    .kind("error"),
            );
        }
        result
    }
}

fn cmd_name_for_log(cmd: &MemoCommand) -> &'static str {
    match cmd {
        MemoCommand::Help => "help",
        MemoCommand::Open => "open",
        MemoCommand::New => "new",
        MemoCommand::List => "list",
        MemoCommand::Add { .. } => "add",
        MemoCommand::Last => "last",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("memo: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

pub fn run() -> Result<i32, Error> {
    let config = match parse_args()? {
        ParseOutcome::Config(c) => c,
        ParseOutcome::GenerateCompletion(shell) => {
            print_completion(shell);
            return Ok(0);
        }
    };
    let app = wire_memo(config.file.clone(), config.non_interactive, config.verbose);
    let mut runner = Runner { app };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: memo [options] <open|new|list|add|last> [text...]");
}

fn print_help() {
    println!("Usage: memo [options] <command> [text...]");
    println!("Commands:");
    println!("  open                          Select an existing memo file and list its memos (newest first)");
    println!("  new                           Choose where to save a new memo file (created empty if missing)");
    println!("  list                          Select a memo file and list its memos");
    println!("  add <text...>                 Append a timestamped memo to the selected file, then list memos");
    println!("  last                          Show the name of the last used memo file");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  -f, --file <path>             Use this file instead of prompting for one (.md, .markdown, .txt)");
    println!("  --no-interactive              Do not prompt; without --file the selection is cancelled");
    println!("  -v, --verbose                 Emit logs to stderr as well as the log file");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  MEMO_HOME       Home directory for preferences.json and log/memo.jsonl.");
    println!("                 If unset, $XDG_CONFIG_HOME/handy-memo (e.g. ~/.config/handy-memo) is used.");
    println!();
    println!("File format (one memo per line):");
    println!("  - 2024-06-01T09:15:30 Buy milk");
    println!();
    println!("Examples:");
    println!("  memo -f ~/notes/handy-memo.md add Buy milk");
    println!("  memo -f ~/notes/handy-memo.md list");
    println!("  memo new");
}
