//! Operator tool for sharedlog configs.
//!
//! Usage:
//!   sharedlog check <config>                         Load a config and show the resolved pipeline
//!   sharedlog emit <config> <level> <msg> [k=v...]   Initialize the logger and write one record

use clap::{Parser, Subcommand, ValueEnum};
use sharedlog::{Config, Field, Level, LevelController, Pipeline, field};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "sharedlog", version, about = "Check and exercise sharedlog configs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load a config and print the pipeline it resolves to.
    Check {
        config: PathBuf,
    },
    /// Initialize the process-wide logger and write one record.
    Emit {
        config: PathBuf,
        #[arg(value_enum)]
        level: LogLevel,
        message: String,
        /// Extra fields as key=value.
        fields: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Dpanic,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
            LogLevel::Dpanic => Self::DPanic,
        }
    }
}

fn main() -> ExitCode {
    match Cli::parse().command {
        Command::Check { config } => cmd_check(&config),
        Command::Emit {
            config,
            level,
            message,
            fields,
        } => cmd_emit(&config, level.into(), &message, &fields),
    }
}

fn cmd_check(path: &Path) -> ExitCode {
    let config = match Config::load(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Pipeline::from_config(&config, LevelController::default());
    println!("config:   {config}");
    println!("level:    {}", pipeline.level());
    println!("encoding: {:?}", pipeline.encoding());
    println!("writer:   {}", pipeline.writer());
    if let Some(policy) = pipeline.writer().rotation() {
        println!(
            "rotation: max_size={}MB max_backups={} max_age={}d compress={}",
            policy.max_size, policy.max_backups, policy.max_age, policy.compress
        );
    }
    match pipeline.sampling() {
        Some(s) => println!(
            "sampling: initial={} thereafter={}",
            s.initial, s.thereafter
        ),
        None => println!("sampling: off"),
    }
    ExitCode::SUCCESS
}

fn cmd_emit(path: &Path, level: Level, message: &str, raw_fields: &[String]) -> ExitCode {
    let (logger, status) = match sharedlog::get_logger(path) {
        Ok(logger) => (logger, ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("{e}");
            (e.into_logger(), ExitCode::FAILURE)
        }
    };

    let fields: Vec<Field> = raw_fields.iter().map(String::as_str).map(parse_field).collect();
    logger.log(level, message, &fields);
    if let Err(e) = logger.sync() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    status
}

/// `key=value`; values that parse as JSON scalars keep their type.
fn parse_field(kv: &str) -> Field {
    let (key, value) = kv.split_once('=').unwrap_or((kv, ""));
    let value = serde_json::from_str::<serde_json::Value>(value)
        .ok()
        .filter(|v| !v.is_object() && !v.is_array())
        .unwrap_or_else(|| serde_json::Value::String(value.to_string()));
    field(key.to_string(), value)
}
