//! Refreshable CLI - drive a pull-to-refresh user list without a screen.

use clap::{Args, Parser, Subcommand};
use refreshable_core::{
    Color, Event, Point, Rect, RefreshConfig, RefreshPhase, State, TouchId, Widget,
};
use refreshable_widgets::{
    ChannelDispatcher, ListView, RefreshPhaseChanged, RefreshableWrapper, StaticUserSource,
    UserList, UserListMessage,
};
use std::collections::VecDeque;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const FRAME_MS: f64 = 1000.0 / 60.0;
const VIEWPORT: Rect = Rect::new(0.0, 0.0, 360.0, 640.0);
const TOUCH_Y: f32 = 40.0;

#[derive(Parser)]
#[command(name = "refreshable")]
#[command(about = "Headless driver for a pull-to-refresh user list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull the list and watch the refresh cycle
    Simulate(SimulateArgs),

    /// Print the effective configuration as TOML
    Config {
        /// Config file to resolve (default: built-in defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SimulateArgs {
    /// Config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Finger translations of one pull, comma separated
    #[arg(long, value_delimiter = ',', default_value = "20,60,110")]
    drag: Vec<f32>,

    /// Let the loading flag alone drive the indicator
    #[arg(long)]
    managed: bool,

    /// Delay between loading finishing and the indicator resetting
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Progress arc colour as hex (e.g. #4CAF50)
    #[arg(long)]
    progress_color: Option<String>,

    /// Number of pulls; each later pull shows the next page
    #[arg(long, default_value = "1")]
    pulls: u32,

    /// Users served by the demo source
    #[arg(long, default_value = "12")]
    users: u32,

    /// Users per page
    #[arg(long, default_value = "6")]
    per_page: u32,

    /// Delay before each page fetch
    #[arg(long, default_value = "5000")]
    load_ms: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate(args) => simulate(args).await,
        Commands::Config { config } => print_config(config.as_ref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(path: Option<&PathBuf>) -> Result<RefreshConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            Ok(RefreshConfig::load(path)?)
        }
        None => Ok(RefreshConfig::default()),
    }
}

fn print_config(path: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = resolve_config(path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

async fn simulate(args: SimulateArgs) -> Result<(), Box<dyn Error>> {
    let mut config = resolve_config(args.config.as_ref())?;
    if args.managed {
        config = config.with_managed_loading(true);
    }
    if let Some(ms) = args.settle_ms {
        config = config.with_settle_delay_ms(ms);
    }
    let settle_frames = frames_for(config.settle_delay_ms as f64 + 2000.0);
    let progress = match args.progress_color.as_deref() {
        Some(hex) => Color::from_hex(hex)?,
        None => Color::BLUE,
    };

    let source = Arc::new(StaticUserSource::demo(args.users, args.per_page));
    let mut users = UserList::new(source).load_delay(Duration::from_millis(args.load_ms));

    let (dispatcher, mut refreshes) = ChannelDispatcher::new();
    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel();
    let mut wrapper = RefreshableWrapper::new(ListView::new(), config)
        .dispatcher(dispatcher)
        .progress_color(progress)
        .on_refresh(move || {
            if msg_tx.send(UserListMessage::Load).is_err() {
                warn!("user list gone; refresh ignored");
            }
        });
    wrapper.layout(VIEWPORT);

    for round in 1..=args.pulls {
        println!("pull {round}: {:?}", args.drag);
        pull(&mut wrapper, &args.drag);

        if refreshes.run_pending() == 0 {
            println!("  released short, no refresh");
        }
        while let Ok(msg) = msg_rx.try_recv() {
            pump(&mut wrapper, &mut users, msg).await?;
        }

        for _ in 0..settle_frames {
            if wrapper.phase() == RefreshPhase::Idle {
                break;
            }
            report(wrapper.tick(FRAME_MS));
        }

        print_users(&users);
        pump(&mut wrapper, &mut users, UserListMessage::More).await?;
    }

    Ok(())
}

/// Touch down, move through `translations` one frame apart, lift.
fn pull(wrapper: &mut RefreshableWrapper<ListView>, translations: &[f32]) {
    let id = TouchId(1);
    let x = VIEWPORT.center().x;
    report_message(wrapper.event(&Event::TouchStart {
        id,
        position: Point::new(x, TOUCH_Y),
    }));

    let mut y = TOUCH_Y;
    for dy in translations {
        report(wrapper.tick(FRAME_MS));
        y = TOUCH_Y + dy;
        report_message(wrapper.event(&Event::TouchMove {
            id,
            position: Point::new(x, y),
        }));
    }

    report_message(wrapper.event(&Event::TouchEnd {
        id,
        position: Point::new(x, y),
    }));
}

/// Run `first` and every message its commands produce, animating the
/// wrapper in real time while tasks are in flight.
async fn pump(
    wrapper: &mut RefreshableWrapper<ListView>,
    users: &mut UserList,
    first: UserListMessage,
) -> Result<(), Box<dyn Error>> {
    let mut pending = VecDeque::from([first]);
    while let Some(msg) = pending.pop_front() {
        debug!(?msg, "user list message");
        let cmd = users.update(msg);
        sync(wrapper, users);
        if cmd.is_none() {
            continue;
        }

        let mut task = tokio::spawn(cmd.run());
        let mut frames = tokio::time::interval(Duration::from_secs_f64(FRAME_MS / 1000.0));
        let reply = loop {
            tokio::select! {
                reply = &mut task => break reply?,
                _ = frames.tick() => report(wrapper.tick(FRAME_MS)),
            }
        };
        pending.extend(reply);
    }
    Ok(())
}

fn sync(wrapper: &mut RefreshableWrapper<ListView>, users: &UserList) {
    wrapper
        .child_mut()
        .set_rows(users.users().iter().map(refreshable_widgets::User::display_name));
    report(wrapper.set_loading(users.is_loading()));
}

fn report(change: Option<RefreshPhaseChanged>) {
    if let Some(change) = change {
        println!("  {} -> {}", change.from, change.to);
    }
}

fn report_message(msg: Option<Box<dyn std::any::Any + Send>>) {
    report(msg.and_then(|m| m.downcast::<RefreshPhaseChanged>().ok().map(|c| *c)));
}

fn print_users(users: &UserList) {
    if let Some(err) = users.last_error() {
        println!("  load failed: {err}");
    }
    println!(
        "  page {}/{}, {} users total",
        users.page(),
        users.total_pages(),
        users.total_users()
    );
    for user in users.users() {
        println!("    #{:<3} {:<20} {}", user.id, user.display_name(), user.email);
    }
}

fn frames_for(ms: f64) -> usize {
    (ms / FRAME_MS).ceil() as usize
}
