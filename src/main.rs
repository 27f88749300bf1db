use anyhow::{Context, Result};
use clap::Parser;
use spectrum_visualizer::analysis::Peak;
use spectrum_visualizer::utils::{format_offset, text_meter};
use spectrum_visualizer::{AppConfig, SpectrumPlayer};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Print the frequency spectrum of a WAV file frame by frame.
#[derive(Parser, Debug)]
#[command(name = "spectrum_visualizer", version, about)]
struct Cli {
    /// WAV file to analyze
    input: PathBuf,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Samples per analysis frame (power of 2)
    #[arg(long)]
    frame_size: Option<usize>,

    /// Analysis ticks per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seconds into the clip to start from
    #[arg(long, default_value_t = 0.0)]
    start: f64,

    /// Seconds of playback to analyze (defaults to the rest of the clip)
    #[arg(long)]
    seconds: Option<f64>,

    /// Number of peaks to list per frame
    #[arg(long, default_value_t = 3)]
    peaks: usize,

    /// Width of the text meter in characters
    #[arg(long, default_value_t = 64)]
    width: usize,

    /// Follow the wall clock instead of stepping through the clip
    #[arg(long)]
    realtime: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => AppConfig::load_or_default(AppConfig::default_path()),
    };
    if let Some(frame_size) = cli.frame_size {
        config.analyzer.frame_size = frame_size;
        config.display.bar_count = config.display.bar_count.min(frame_size.saturating_sub(1));
    }
    if let Some(fps) = cli.fps {
        config.display.target_fps = fps;
    }
    config.validate().context("Invalid configuration")?;

    let mut player = SpectrumPlayer::open(&cli.input, &config)
        .with_context(|| format!("Failed to set up analysis of '{}'", cli.input.display()))?;

    let start_offset = Duration::try_from_secs_f64(cli.start)
        .context("--start must be a non-negative number of seconds")?;
    let seconds = cli
        .seconds
        .unwrap_or_else(|| player.duration().saturating_sub(start_offset).as_secs_f64());
    let frame_interval = Duration::from_secs_f64(1.0 / config.display.target_fps as f64);
    let frames = (seconds * config.display.target_fps as f64).floor() as u64;

    tracing::info!(
        input = %cli.input.display(),
        sample_rate = player.sample_rate(),
        channels = player.channel_count(),
        frame_size = config.analyzer.frame_size,
        frames,
        "Starting analysis"
    );

    if cli.realtime {
        player.seek(start_offset);
        player.play();
        let start = Instant::now();
        for frame in 0..frames {
            let deadline = start + frame_interval.mul_f64(frame as f64);
            if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
            player.update();
            print_frame(&player, &config, player.playing_offset(), &cli);
        }
    } else {
        for frame in 0..frames {
            let offset = start_offset.as_secs_f64() + frame as f64 * frame_interval.as_secs_f64();
            player.update_at_offset(offset);
            print_frame(&player, &config, offset, &cli);
        }
    }

    if let Some(metrics) = player.metrics() {
        let summary = metrics.summary();
        tracing::info!(
            updated = summary.ticks_updated,
            starved = summary.ticks_starved,
            p50_us = summary.tick_p50_us,
            p99_us = summary.tick_p99_us,
            "Analysis complete"
        );
    }

    Ok(())
}

fn print_frame(player: &SpectrumPlayer, config: &AppConfig, offset: f64, cli: &Cli) {
    let display = &config.display;
    let heights = player.bar_heights(display.bar_count, display.intensity, display.max_bar_height);
    let peaks = player
        .peaks(cli.peaks)
        .iter()
        .map(describe_peak)
        .collect::<Vec<_>>()
        .join("  ");

    println!(
        "{}  |{}|  {}",
        format_offset(offset),
        text_meter(&heights, cli.width, display.max_bar_height),
        peaks
    );
}

fn describe_peak(peak: &Peak) -> String {
    format!("{:.1} Hz ({:.4})", peak.frequency_hz, peak.magnitude)
}
