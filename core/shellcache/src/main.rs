mod adapter;
mod cli;
mod domain;
mod ports;
mod usecase;
mod wiring;

#[cfg(test)]
mod tests;

use std::io::Write;
use std::process;
use common::error::Error;
use common::ports::outbound::{LogLevel, LogRecord};
use cli::render::{render_activate, render_install, render_status};
use cli::{config_to_command, parse_args, print_completion, Config, ParseOutcome};
use domain::{CacheCommand, ShellRequest};
use ports::inbound::UseCaseRunner;
use usecase::controller::FetchSource;
use wiring::{wire_default, App};

/// Command をディスパッチする Runner
struct Runner {
    app: App,
    out: Box<dyn Write>,
}

impl Runner {
    fn dispatch(&mut self, cmd: CacheCommand) -> Result<i32, Error> {
        let io = |e: std::io::Error| Error::io_msg(e.to_string());
        match cmd {
            CacheCommand::Help => {
                print_help();
                Ok(0)
            }
            CacheCommand::Install => {
                let report = self.app.controller.install()?;
                writeln!(self.out, "{}", render_install(&report)).map_err(io)?;
                Ok(0)
            }
            CacheCommand::Activate => {
                let report = self.app.controller.activate()?;
                writeln!(self.out, "{}", render_activate(&report)).map_err(io)?;
                Ok(0)
            }
            CacheCommand::Update => {
                let (installed, activated) = self.app.controller.update()?;
                writeln!(self.out, "{}", render_install(&installed)).map_err(io)?;
                if let Some(report) = activated {
                    writeln!(self.out, "{}", render_activate(&report)).map_err(io)?;
                }
                Ok(0)
            }
            CacheCommand::Fetch { url } => {
                let outcome = self.app.controller.handle_fetch(&ShellRequest::get(url))?;
                let source = match outcome.source {
                    FetchSource::Cache => "cache",
                    FetchSource::Network => "network",
                };
                eprintln!("{} {}", outcome.response.status, source);
                self.out.write_all(&outcome.response.body).map_err(io)?;
                self.out.flush().map_err(io)?;
                Ok(if outcome.response.is_success() { 0 } else { 1 })
            }
            CacheCommand::Status => {
                let report = self.app.controller.status()?;
                writeln!(self.out, "{}", render_status(&report)).map_err(io)?;
                Ok(0)
            }
        }
    }
}

impl UseCaseRunner for Runner {
    fn run(&mut self, config: Config) -> Result<i32, Error> {
        let cmd = config_to_command(&config)?;
        let command_name = cmd_name_for_log(&cmd);
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command started")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("cache_name", self.app.controller.cache_name().as_str()),
        );

        let result = self.dispatch(cmd);

        let code = match &result {
            Ok(code) => *code,
            Err(e) => e.exit_code(),
        };
        let _ = self.app.logger.log(
            &LogRecord::new(LogLevel::Info, "command finished")
                .layer("cli")
                .kind("lifecycle")
                .field("command", command_name)
                .field("state", self.app.controller.state().as_str())
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

fn cmd_name_for_log(cmd: &CacheCommand) -> &'static str {
    match cmd {
        CacheCommand::Help => "help",
        CacheCommand::Install => "install",
        CacheCommand::Activate => "activate",
        CacheCommand::Update => "update",
        CacheCommand::Fetch { .. } => "fetch",
        CacheCommand::Status => "status",
    }
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                print_usage();
            }
            eprintln!("shellcache: {}", e);
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
    let app = wire_default(&config)?;
    let mut runner = Runner {
        app,
        out: Box::new(std::io::stdout()),
    };
    runner.run(config)
}

fn print_usage() {
    eprintln!("Usage: shellcache [options] <install|activate|update|fetch <url>|status>");
}

fn print_help() {
    println!("Usage: shellcache [options] <command>");
    println!("Commands:");
    println!("  install                       Fetch every shell resource (bypassing caches) into a new snapshot");
    println!("  activate                      Delete snapshots of other versions and take control of clients");
    println!("  update                        Install, then activate without waiting");
    println!("  fetch <url>                   Serve one GET request cache-first; the body goes to stdout");
    println!("  status                        Show controller state and stored snapshots");
    println!("Options:");
    println!("  -h, --help                    Show this help message");
    println!("  --cache-dir <dir>             Snapshot directory (default: $MEMO_HOME/cache)");
    println!("  --base-url <url>              Scope for relative manifest entries (default: http://localhost:8080/)");
    println!("  --cache-name <name>           Cache version identifier (default: handy-memo-cache-v1)");
    println!("  -v, --verbose                 Emit logs to stderr as well as the log file");
    println!("  --generate <shell>            Generate shell completion script (bash, zsh, fish)");
    println!();
    println!("Environment:");
    println!("  MEMO_HOME        Home directory for cache/ and log/shellcache.jsonl.");
    println!("  SHELLCACHE_NAME  Cache version identifier when --cache-name is not given.");
    println!();
    println!("Changing the cache name and running update removes every older snapshot.");
}
