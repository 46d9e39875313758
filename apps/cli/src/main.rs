use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{Catalog, ClientError, Dispatcher, HttpRegistry, Outcome};
use shared::domain::{Action, NotificationKind, NotificationState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, normalize_registry_url};

#[derive(Parser, Debug)]
#[command(name = "activities", about = "Browse activities and manage sign-ups")]
struct Args {
    /// Overrides the registry url from settings.
    #[arg(long)]
    registry_url: Option<String>,
    /// Settings file; defaults to ./activities.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show every activity with its roster.
    List,
    /// Sign a participant up for an activity.
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Remove a participant from an activity.
    Withdraw {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    /// Read actions from stdin, one per line.
    Shell,
}

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand {
    List,
    Refresh,
    Signup { email: String, activity: String },
    Withdraw { email: String, activity: String },
    /// Resubmits the signup form as left by the last attempt.
    Retry,
    Help,
    Quit,
}

const SHELL_HELP: &str = "commands: list | refresh | signup <email> <activity> | withdraw <email> <activity> | retry | help | quit";

fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match verb {
        "list" | "ls" => ShellCommand::List,
        "refresh" => ShellCommand::Refresh,
        "retry" => ShellCommand::Retry,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        "signup" | "withdraw" => {
            let Some((email, activity)) = rest.split_once(char::is_whitespace) else {
                return Err(format!("usage: {verb} <email> <activity>"));
            };
            let email = email.to_string();
            let activity = activity.trim().to_string();
            if verb == "signup" {
                ShellCommand::Signup { email, activity }
            } else {
                ShellCommand::Withdraw { email, activity }
            }
        }
        other => return Err(format!("unknown command '{other}'; {SHELL_HELP}")),
    };
    Ok(Some(command))
}

fn notice_line(state: &NotificationState) -> String {
    let tag = match state.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
    };
    format!("[{tag}] {}", state.text)
}

async fn settle_and_show(catalog: &Catalog, outcome: Outcome) {
    let mutation = outcome.mutation;
    if let Err(err) = outcome.settle().await {
        warn!("refresh after {mutation:?} failed: {err}");
    }
    print!("{}", catalog.view().await);
}

async fn run_action(catalog: &Catalog, dispatcher: &Dispatcher, action: Action) -> Result<bool> {
    let outcome = dispatcher.dispatch(action).await?;
    println!("{}", notice_line(&catalog.banner().state()));
    let succeeded = outcome.succeeded();
    settle_and_show(catalog, outcome).await;
    Ok(succeeded)
}

async fn run_shell(catalog: Arc<Catalog>, dispatcher: Dispatcher) -> Result<()> {
    let mut notices = catalog.banner().subscribe();
    let printer = tokio::spawn(async move {
        while notices.changed().await.is_ok() {
            let state = notices.borrow_and_update().clone();
            if state.visible {
                println!("{}", notice_line(&state));
            }
        }
    });

    println!("{SHELL_HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };

        let action = match command {
            ShellCommand::List => {
                print!("{}", catalog.view().await);
                continue;
            }
            ShellCommand::Refresh => {
                if let Err(err) = catalog.refresh().await {
                    println!("refresh failed: {err}");
                }
                print!("{}", catalog.view().await);
                continue;
            }
            ShellCommand::Help => {
                println!("{SHELL_HELP}");
                continue;
            }
            ShellCommand::Quit => break,
            ShellCommand::Signup { email, activity } => {
                catalog.set_form(activity.clone(), email.clone()).await;
                Action::Signup { activity, email }
            }
            ShellCommand::Retry => {
                let form = catalog.form().await;
                Action::Signup {
                    activity: form.activity,
                    email: form.email,
                }
            }
            ShellCommand::Withdraw { email, activity } => Action::Withdraw { activity, email },
        };

        match dispatcher.dispatch(action).await {
            Ok(outcome) => settle_and_show(&catalog, outcome).await,
            Err(ClientError::Dispatch(err)) => println!("{err}"),
            Err(err) => return Err(err.into()),
        }
    }

    printer.abort();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let raw_url = args
        .registry_url
        .as_deref()
        .unwrap_or(settings.registry_url.as_str());
    let registry =
        HttpRegistry::with_timeout(normalize_registry_url(raw_url)?, settings.request_timeout())
            .context("failed to set up registry client")?;
    let catalog = Catalog::new(Arc::new(registry));
    let dispatcher = Dispatcher::new(&catalog);

    if let Err(err) = catalog.refresh().await {
        warn!("initial load failed: {err}");
    }

    let succeeded = match args.command.unwrap_or(Command::List) {
        Command::List => {
            print!("{}", catalog.view().await);
            true
        }
        Command::Signup { activity, email } => {
            catalog.set_form(activity.clone(), email.clone()).await;
            run_action(&catalog, &dispatcher, Action::Signup { activity, email }).await?
        }
        Command::Withdraw { activity, email } => {
            run_action(&catalog, &dispatcher, Action::Withdraw { activity, email }).await?
        }
        Command::Shell => {
            run_shell(Arc::clone(&catalog), dispatcher).await?;
            true
        }
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
