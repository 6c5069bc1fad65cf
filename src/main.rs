//! Headless try-on pipeline demo driving scripted detectors.

use std::rc::Rc;

use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use virtual_tryon::assets::builtin_assets;
use virtual_tryon::config::Config;
use virtual_tryon::processor::TryOnProcessor;
use virtual_tryon::scripted::{ScriptedDetectorProvider, ScriptedVideo};
use virtual_tryon::session::{InitializeSessionInput, SessionAdapter, SessionOptions};
use virtual_tryon::state::DeviceProfile;
use virtual_tryon::surface::{ConsoleOverlay, FrameSource};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Asset to try on (glasses, makeup, shoes)
    #[arg(short, long, default_value = "glasses")]
    asset: String,

    /// Device profile to report (desktop, mobile, tablet)
    #[arg(long, default_value = "desktop")]
    device: String,

    /// Number of scripted video frames to drive
    #[arg(short, long, default_value = "120")]
    frames: u32,

    /// List the builtin asset catalog and exit
    #[arg(long)]
    list_assets: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.list_assets {
        for asset in builtin_assets() {
            println!(
                "{:10} {:10} fps target {}",
                asset.id,
                asset.label,
                asset
                    .model_config
                    .fps_target
                    .map_or_else(|| "default".to_string(), |fps| fps.to_string())
            );
        }
        return Ok(());
    }

    let config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {path}");
            Config::from_file(path)?
        }
        None => Config::default(),
    };
    config.validate()?;

    let assets = builtin_assets();
    let Some(asset) = assets.iter().find(|asset| asset.id == args.asset).cloned() else {
        bail!("unknown asset: {}", args.asset);
    };

    let device_profile = match args.device.as_str() {
        "mobile" => DeviceProfile::Mobile,
        "tablet" => DeviceProfile::Tablet,
        _ => DeviceProfile::Desktop,
    };

    let mut session = SessionAdapter::new(SessionOptions {
        metrics: config.create_metrics_tracker(),
        default_fps_target: config.session.default_fps_target,
        ..SessionOptions::default()
    });

    let response = session.initialize_session(&InitializeSessionInput {
        asset_id: asset.id.clone(),
        device_profile,
    })?;
    info!("session ready, fps target {}", response.fps_target);
    if let Some(notes) = &response.notes {
        info!("{notes}");
    }

    let mut processor = TryOnProcessor::with_settings(
        Box::new(ScriptedDetectorProvider::new()),
        config.create_smoother(),
        config.processing.process_interval_ms,
    );
    let video = Rc::new(ScriptedVideo::new(1280.0, 720.0));
    processor.attach(Rc::clone(&video) as Rc<dyn FrameSource>, Rc::new(ConsoleOverlay));
    processor.set_asset(&asset);
    processor.set_overlay_enabled(true);

    let frame_interval_ms = 1000.0 / f64::from(response.fps_target);
    let mut timestamp = 0.0;

    for _ in 0..args.frames {
        video.advance(frame_interval_ms / 1000.0);
        processor.process_video_frame(timestamp);
        session.record_frame(Some(timestamp));
        timestamp += frame_interval_ms;
    }

    let metrics = session.metrics_at(timestamp);
    println!(
        "processed {} frames: rolling fps {:.2}, latency {:.2} ms",
        args.frames, metrics.rolling_fps, metrics.latency_ms
    );

    processor.dispose();
    Ok(())
}
