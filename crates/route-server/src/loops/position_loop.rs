//! Position ingest loop.
//!
//! Drains the sample queue one sample at a time so that position updates
//! never interleave with each other inside the engine.

use chrono::Utc;
use route_core::PositionSample;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use crate::state::AppState;

/// Samples older than this are still applied, but logged.
const STALE_SAMPLE_MS: i64 = 5_000;

pub async fn run_position_loop(
    state: Arc<AppState>,
    mut samples: mpsc::Receiver<PositionSample>,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::info!("Position loop shutting down");
                break;
            }
            sample = samples.recv() => {
                let Some(sample) = sample else {
                    tracing::info!("Position queue closed");
                    break;
                };

                let lag_ms = (Utc::now() - sample.received_at).num_milliseconds();
                if lag_ms > STALE_SAMPLE_MS {
                    tracing::debug!("Applying sample {}ms after arrival", lag_ms);
                }

                if let Err(e) = state.apply_position(sample) {
                    tracing::warn!("Dropped position sample {}: {}", sample.coordinate, e);
                }
            }
        }
    }
}
