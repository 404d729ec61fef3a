// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! SwipeSort terminal client
//!
//! Triage a running SwipeSort service from the terminal. Keys map to the same
//! decisions as swipes in the browser, and `swipe <dx> <dy>` feeds a raw
//! displacement through the gesture rules.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use swipesort::config::AppConfig;
use swipesort::store::Verdict;
use swipesort::triage::gesture::Rgba;
use swipesort::triage::{
    Decision, DragTracker, GestureOutcome, HttpImageService, ImageService, Poller, SwipeGeometry,
    TriageSession, View,
};

#[derive(Parser, Debug)]
#[command(name = "swipesort-triage")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Triage pending images from the terminal")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "swipesort.json")]
    config: PathBuf,

    /// Service URL (overrides config)
    #[arg(short, long)]
    server: Option<String>,

    /// Poll interval in milliseconds (overrides config)
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Decide(Verdict),
    Swipe { dx: f64, dy: f64 },
    Reload,
    Status,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "a" | "approve" | "right" => Command::Decide(Verdict::Approve),
        "d" | "decline" | "left" => Command::Decide(Verdict::Decline),
        "r" | "reload" => Command::Reload,
        "s" | "status" => Command::Status,
        "h" | "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,
        "swipe" => {
            let dx = parts.next()?.parse().ok()?;
            let dy = match parts.next() {
                Some(dy) => dy.parse().ok()?,
                None => 0.0,
            };
            Command::Swipe { dx, dy }
        }
        _ => return None,
    };
    Some(command)
}

type Completion = (Decision, swipesort::Result<()>);

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = AppConfig::load(&args.config).context("loading configuration")?;
    if let Some(server) = args.server {
        config.triage.server_url = server;
    }
    if let Some(poll_ms) = args.poll_ms {
        config.triage.poll_interval_ms = poll_ms;
    }
    config.validate()?;

    let http = Arc::new(
        HttpImageService::new(&config.triage.server_url).context("creating service client")?,
    );
    let service: Arc<dyn ImageService> = http.clone();
    info!("Connected to {}", http.base_url());

    let settle = Duration::from_millis(config.triage.settle_delay_ms);
    let mut tracker = DragTracker::new(SwipeGeometry::from_config(&config.triage));
    let mut session = TriageSession::new();
    session.reload(service.as_ref()).await;
    print_view(&session, &http);
    print_help();

    let mut poller = Poller::new(Duration::from_millis(config.triage.poll_interval_ms));
    poller.tick().await;

    let (done_tx, mut done_rx) = mpsc::channel::<Completion>(1);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Some(Command::Quit) => break,
                    Some(Command::Help) => print_help(),
                    Some(Command::Status) => print_view(&session, &http),
                    Some(Command::Reload) => {
                        if session.resync(service.as_ref()).await {
                            print_view(&session, &http);
                        }
                    }
                    Some(Command::Decide(verdict)) => {
                        start_decision(&mut session, &service, verdict, settle, &done_tx);
                    }
                    Some(Command::Swipe { dx, dy }) => {
                        if session.is_busy() {
                            println!("busy");
                            continue;
                        }
                        tracker.press(0.0, 0.0);
                        if let Some(fb) = tracker.motion(dx, dy) {
                            debug!("Drag feedback: {:?}", fb);
                            print_background(fb.background);
                        }
                        match tracker.release(dx, dy) {
                            Some(GestureOutcome::Commit(verdict)) => {
                                if !start_decision(&mut session, &service, verdict, settle, &done_tx) {
                                    tracker.settle();
                                }
                            }
                            Some(GestureOutcome::SnapBack) => {
                                println!("snapped back");
                                tracker.settle();
                            }
                            Some(GestureOutcome::Ignored) | None => {
                                println!("ignored (vertical)");
                                tracker.settle();
                            }
                        }
                    }
                    None => println!("unknown command, type 'h' for help"),
                }
            }
            _ = poller.tick() => {
                if Poller::poll_once(&mut session, service.as_ref()).await.needs_reload() {
                    info!("Pending folder changed, reloaded");
                    print_view(&session, &http);
                }
            }
            Some((decision, outcome)) = done_rx.recv() => {
                let ok = outcome.is_ok();
                session.complete_decision(&decision, &outcome);
                tracker.settle();
                if ok {
                    println!("{}: {}", decision.verdict, decision.filename);
                }
                print_view(&session, &http);
            }
        }
    }

    Ok(())
}

fn start_decision(
    session: &mut TriageSession,
    service: &Arc<dyn ImageService>,
    verdict: Verdict,
    settle: Duration,
    done_tx: &mpsc::Sender<Completion>,
) -> bool {
    let Some(decision) = session.begin_decision(verdict) else {
        if session.current().is_none() {
            println!("nothing to decide");
        }
        return false;
    };

    let service = Arc::clone(service);
    let done_tx = done_tx.clone();
    tokio::spawn(async move {
        let outcome = service.decide(&decision.filename, decision.verdict).await;
        if outcome.is_ok() {
            tokio::time::sleep(settle).await;
        }
        let _ = done_tx.send((decision, outcome)).await;
    });
    true
}

fn print_view(session: &TriageSession, http: &HttpImageService) {
    match session.view() {
        View::Empty => println!("No images to sort"),
        View::Image { filename, remaining } => {
            let url = http
                .image_url(filename)
                .map(|u| u.to_string())
                .unwrap_or_default();
            println!("{} remaining | {} {}", remaining, filename, url);
            if let Some(next) = session.surfaces().standby().source.as_deref() {
                debug!("Preloaded: {}", next);
            }
        }
    }
}

fn print_background(color: Rgba) {
    if color.a > 0.0 && color != Rgba::NEUTRAL {
        println!("[rgba({}, {}, {}, {:.2})]", color.r, color.g, color.b, color.a);
    }
}

fn print_help() {
    println!("a/approve  d/decline  swipe <dx> [dy]  r/reload  s/status  q/quit");
}
