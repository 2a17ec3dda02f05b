mod command;
mod config;
mod view;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use taskdeck_core::ports::ChannelEventSink;
use taskdeck_core::{ControllerBuilder, ControllerHandle, ListEvent, TaskId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::command::{Command, HELP};
use crate::view::ListView;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Interactive to-do list")]
struct Args {
    /// Settings file (default: ./taskdeck.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `taskdeck_core=trace`
    #[arg(long)]
    log: Option<String>,
}

/// What the prompt does after a command.
enum Flow {
    Render,
    Quiet,
    Quit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = config::load_settings(args.config.as_deref())?;

    // --log > RUST_LOG > settings
    let directive = args
        .log
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| settings.log.clone());
    let filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{directive}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let timing = settings.timing();
    info!(
        delete_delay_ms = timing.delete_delay.as_millis() as u64,
        stagger_step_ms = timing.stagger_step.as_millis() as u64,
        "taskdeck starting"
    );

    let (sink, mut events) = ChannelEventSink::new();
    let controller = ControllerBuilder::new()
        .timing(timing)
        .event_sink(Arc::new(sink))
        .build();
    let handle = ControllerHandle::new(controller);
    let timers = handle.spawn_timers();

    let mut view = ListView::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let flow = match command::parse(&line) {
                    Ok(cmd) => execute(&handle, cmd).await?,
                    Err(e) => {
                        eprintln!("{e}");
                        Flow::Quiet
                    }
                };
                drain(&mut events, &mut view);
                match flow {
                    Flow::Render => render(&handle, &view).await,
                    Flow::Quiet => {}
                    Flow::Quit => break,
                }
            }
            Some(event) = events.recv() => {
                // fired by the timer task
                view.apply(&event);
                drain(&mut events, &mut view);
                render(&handle, &view).await;
            }
        }
    }

    // let pending removals finish so the last list is final
    handle.settle().await;
    drain(&mut events, &mut view);
    render(&handle, &view).await;
    timers.shutdown_and_join().await;
    debug!("bye");
    Ok(())
}

async fn execute(handle: &ControllerHandle, cmd: Command) -> anyhow::Result<Flow> {
    debug!(?cmd, "command");
    match cmd {
        Command::Add { title, date } => {
            if let Err(e) = handle.add_task(&title, date).await {
                eprintln!("{e}");
                return Ok(Flow::Quiet);
            }
        }
        Command::Toggle(n) => match task_at(handle, n).await {
            Some(id) => handle.toggle_task(id).await,
            None => return Ok(no_task(n)),
        },
        Command::Delete(n) => match task_at(handle, n).await {
            Some(id) => handle.delete_task(id).await,
            None => return Ok(no_task(n)),
        },
        Command::Clear => {
            let n = handle.clear_completed().await;
            if n == 0 {
                println!("nothing to clear");
            }
        }
        Command::CompletedFirst => handle.sort_completed_first().await,
        Command::CompletedLast => handle.sort_completed_last().await,
        Command::Move { from, to } => handle.drop_task(from, to).await,
        Command::List => {}
        Command::Json => {
            let snapshot = handle.snapshot().await;
            println!(
                "{}",
                serde_json::to_string_pretty(&snapshot).context("failed to encode list")?
            );
            return Ok(Flow::Quiet);
        }
        Command::Help => {
            println!("{HELP}");
            return Ok(Flow::Quiet);
        }
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Render)
}

async fn task_at(handle: &ControllerHandle, index: usize) -> Option<TaskId> {
    handle.snapshot().await.get(index).map(|t| t.id())
}

fn no_task(index: usize) -> Flow {
    eprintln!("no task at position {}", index + 1);
    Flow::Quiet
}

fn drain(events: &mut UnboundedReceiver<ListEvent>, view: &mut ListView) {
    while let Ok(event) = events.try_recv() {
        view.apply(&event);
    }
}

async fn render(handle: &ControllerHandle, view: &ListView) {
    let (list, counts) = handle.snapshot_with_counts().await;
    println!("{}", view.render(&list, counts));
}
