// src/main.rs
//
// Replay driver: synthetic detections -> tracker runtime -> gesture pipeline.

use anyhow::Result;
use hand_gesture_tracking::pipeline::{GesturePipeline, PipelineEvent};
use hand_gesture_tracking::tracking::{HandTrackingRuntime, SyntheticHandSource};
use hand_gesture_tracking::types::Config;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config_path = std::env::var("HAND_GESTURES_CONFIG")
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config_found = Path::new(&config_path).exists();
    let config = if config_found {
        Config::load(&config_path)?
    } else {
        Config::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("✋ Hand Gesture Tracking replay starting");
    if config_found {
        info!("✓ Configuration loaded from {}", config_path);
    } else {
        warn!("⚠️  {} not found, using built-in defaults", config_path);
    }

    let quality = config.tracking.quality.settings();
    info!(
        "Quality preset {}: {}x{} @ {} fps inference",
        config.tracking.quality.as_str(),
        quality.width,
        quality.height,
        quality.inference_fps
    );
    info!(
        "Pinch band: enter={:.2} exit={:.2}, hysteresis={}ms",
        config.gestures.pinch_enter, config.gestures.pinch_exit, config.tracking.hysteresis_ms
    );

    let source = SyntheticHandSource::new().with_jitter(config.replay.frame_jitter_ms);
    let mut runtime = HandTrackingRuntime::new(source, &config.tracking);
    let mut pipeline = GesturePipeline::new(&config);

    let running = Arc::new(AtomicBool::new(true));
    let signal_flag = running.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Ctrl-C received, stopping replay");
            signal_flag.store(false, Ordering::SeqCst);
        }
    });

    let started = Instant::now();
    let duration = Duration::from_secs_f64(config.replay.duration_secs.max(0.0));
    let mut interval = tokio::time::interval(Duration::from_secs_f64(
        1.0 / f64::from(config.replay.render_hz.max(1)),
    ));

    runtime.start();
    if config.replay.calibrate_first {
        runtime.reset_tracking();
        pipeline.start_calibration(0.0);
    }

    let mut calibration_stage = None;
    while running.load(Ordering::SeqCst) && started.elapsed() < duration {
        interval.tick().await;
        let now_ms = started.elapsed().as_secs_f64() * 1000.0;

        let Some(frame) = runtime.tick(now_ms)? else {
            continue;
        };
        let output = pipeline.process(&frame);

        if let Some(hint) = output.hint {
            debug!("Hint at {:.0}ms: {}", now_ms, hint.message());
        }
        if let Some(update) = &output.calibration {
            if calibration_stage != Some(update.stage) {
                info!(
                    "🎯 Calibration stage {} ({} pinches)",
                    update.stage.as_str(),
                    update.pinch_count
                );
                calibration_stage = Some(update.stage);
            }
        }

        for event in pipeline.drain_events() {
            log_event(&event);
        }
    }

    runtime.stop();

    let summary = pipeline.metrics().summary();
    info!(
        "✓ Replay finished: {} frames, {} taps, {} releases",
        summary.frames_processed, summary.pinch_taps, summary.releases
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

fn log_event(event: &PipelineEvent) {
    match event {
        PipelineEvent::Released {
            timestamp_ms,
            launch,
            from_pointer,
        } => info!(
            "🚀 Released at {:.0}ms: vx={:.2} vy={:.2}{}",
            timestamp_ms,
            launch.vx,
            launch.vy,
            if *from_pointer { " (pointer)" } else { "" }
        ),
        PipelineEvent::CalibrationCompleted { thresholds, .. } => info!(
            "✅ Calibrated band: enter={:.3} exit={:.3}",
            thresholds.pinch_enter, thresholds.pinch_exit
        ),
        other => info!("{} {}", event_marker(other), other.name()),
    }
}

fn event_marker(event: &PipelineEvent) -> &'static str {
    match event {
        PipelineEvent::PinchTap { .. }
        | PipelineEvent::PinchHoldStarted { .. }
        | PipelineEvent::PinchEnded { .. } => "🤏",
        PipelineEvent::OpenPalmHold { .. } => "🖐️ ",
        PipelineEvent::FistHold { .. } => "✊",
        _ => "•",
    }
}
