//! Framescrub CLI
//!
//! Scrub through an image sequence with the mouse, either in the terminal
//! viewer or headlessly from stdin samples.

use clap::Parser;
use framescrub::tui::App;
use framescrub::{AnimationController, FsFrameLoader, InputEvent, NullCanvas, ScrubConfig};
use std::path::PathBuf;
use tokio::io::AsyncBufReadExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Framescrub - pointer-scrubbed image sequence viewer
#[derive(Parser, Debug)]
#[command(name = "framescrub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the image sequence
    #[arg(short = 'd', long)]
    frames_dir: Option<PathBuf>,

    /// File name prefix shared by every frame
    #[arg(long)]
    prefix: Option<String>,

    /// File extension (without the dot)
    #[arg(long)]
    extension: Option<String>,

    /// Zero-pad width of the frame number in file names
    #[arg(long)]
    pad_width: Option<usize>,

    /// Total number of frames in the sequence
    #[arg(short = 'n', long)]
    frame_count: Option<usize>,

    /// TOML config file; explicit flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable the TUI and read position samples from stdin
    #[arg(long)]
    no_tui: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    if cli.no_tui {
        run_plain_mode(&cli, config).await
    } else {
        run_tui_mode(config).await
    }
}

async fn run_tui_mode(config: ScrubConfig) -> anyhow::Result<()> {
    let mut app = App::new(config)?;
    app.run().await?;
    Ok(())
}

async fn run_plain_mode(cli: &Cli, config: ScrubConfig) -> anyhow::Result<()> {
    // Setup logging for plain mode (the TUI owns the terminal, so only here)
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        "Loading {} frames from {:?}",
        config.frame_count, config.frames_dir
    );
    let mut controller = AnimationController::new(config, FsFrameLoader, NullCanvas::new())?;
    controller.load_all(|_, _| {}).await;

    let status = controller.status();
    info!("Frames settled: {}/{} loaded", status.loaded, status.total);

    // One sample per line: "<x> <viewport_width>", or "leave" / "resize"
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_sample(&line) {
            Some(event) => controller.handle_event(event),
            None => warn!("ignoring malformed sample: {:?}", line),
        }
    }

    // Final status snapshot on EOF
    println!("{}", serde_json::to_string_pretty(&controller.status())?);
    Ok(())
}

/// Merge the optional config file with explicit flags (flags win).
fn build_config(cli: &Cli) -> anyhow::Result<ScrubConfig> {
    let mut config = match &cli.config {
        Some(path) => ScrubConfig::from_toml_file(path)?,
        None => ScrubConfig::default(),
    };

    if let Some(frames_dir) = &cli.frames_dir {
        config.frames_dir = frames_dir.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(extension) = &cli.extension {
        config.extension = extension.clone();
    }
    if let Some(pad_width) = cli.pad_width {
        config.pad_width = pad_width;
    }
    if let Some(frame_count) = cli.frame_count {
        config.frame_count = frame_count;
    }

    config.validate()?;
    Ok(config)
}

/// Parse one stdin sample line.
fn parse_sample(line: &str) -> Option<InputEvent> {
    match line.trim() {
        "leave" => Some(InputEvent::PointerLeave),
        "resize" => Some(InputEvent::Resize),
        sample => {
            let mut parts = sample.split_whitespace();
            let x = parts.next()?.parse().ok()?;
            let viewport_width = parts.next()?.parse().ok()?;
            if parts.next().is_some() {
                return None;
            }
            Some(InputEvent::PointerMove { x, viewport_width })
        }
    }
}
