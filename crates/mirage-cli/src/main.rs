//! Mirage terminal client entry point.

#![allow(clippy::print_stdout, reason = "console output is this binary's job")]

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use mirage_app::Runtime;
use mirage_cli::{input, ConsolePresenter, FileStore, Input, SystemEnv};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Mirage chat simulation client
#[derive(Parser, Debug)]
#[command(name = "mirage")]
#[command(about = "Interactive client for the Mirage chat simulation")]
#[command(version)]
struct Args {
    /// Path of the session credential file
    #[arg(long, default_value = "mirage-session.json")]
    store: PathBuf,

    /// Write an HTML transcript of the conversation to this path
    #[arg(long)]
    transcript: Option<PathBuf>,

    /// Timer resolution in milliseconds
    #[arg(long, default_value = "250")]
    tick_millis: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let env = SystemEnv::new();
    let store = FileStore::new(args.store);
    let presenter = ConsolePresenter::new(args.transcript.as_deref())?;

    let mut runtime = Runtime::new(env, store, presenter);
    runtime.start()?;
    println!("{}", input::HELP_TEXT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_millis(args.tick_millis.max(1)));

    loop {
        tokio::select! {
            _ = tick.tick() => runtime.tick()?,

            line = lines.next_line() => {
                let Some(line) = line? else {
                    break; // stdin closed
                };
                match input::parse_line(&line) {
                    Ok(Input::Command(command)) => runtime.dispatch(command)?,
                    Ok(Input::Help) => println!("{}", input::HELP_TEXT),
                    Ok(Input::Quit) => break,
                    Ok(Input::Empty) => {},
                    Err(err) => println!("(error) {err}"),
                }
            }
        }
    }

    Ok(())
}
