//! The slideshow controller task.
//!
//! Owns the [`SlideshowState`] exclusively and mutates it only from discrete
//! event completions: the one-shot gallery fetch, autoplay ticks, forwarded
//! user events, and measurement results. Snapshots are published on a watch
//! channel after every mutation.

use anyhow::Result;
use tokio::select;
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::sync::watch;
use tokio::time::{self, Duration, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::Configuration;
use crate::events::{ControllerEvent, Measured};
use crate::lister::ScreenshotSource;
use crate::measure::DimensionProbe;
use crate::state::{Effect, SlideshowState};

/// The slice of [`Configuration`] the controller needs.
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub autoplay_interval: Duration,
    pub max_slide_width: f32,
    pub fallback_screenshots: Vec<String>,
}

impl From<&Configuration> for ControllerOptions {
    fn from(cfg: &Configuration) -> Self {
        Self {
            autoplay_interval: cfg.autoplay_interval,
            max_slide_width: cfg.max_slide_width,
            fallback_screenshots: cfg.fallback_screenshots.clone(),
        }
    }
}

/// Drive the slideshow until cancellation or until the event channel closes.
///
/// Teardown leaves no live timer: the interval is owned by this future and
/// dropped with it, and in-flight probe results go to a receiver that no
/// longer exists.
pub async fn run<S, P>(
    opts: ControllerOptions,
    source: S,
    probe: P,
    mut events_rx: Receiver<ControllerEvent>,
    state_tx: watch::Sender<SlideshowState>,
    cancel: CancellationToken,
) -> Result<()>
where
    S: ScreenshotSource,
    P: DimensionProbe,
{
    let mut state = SlideshowState::new(opts.max_slide_width);
    state_tx.send_replace(state.clone());

    // One-shot fetch; no retry. Failure substitutes the build-time fallback
    // list so the carousel is never empty over a transient problem.
    let screenshots = select! {
        _ = cancel.cancelled() => {
            info!("cancel received before gallery load settled");
            return Ok(());
        }
        fetched = source.fetch() => match fetched {
            Ok(list) => {
                info!(count = list.len(), "screenshot list fetched");
                list
            }
            Err(err) => {
                warn!(error = %err, "screenshot fetch failed; using fallback list");
                opts.fallback_screenshots.clone()
            }
        },
    };

    let (measured_tx, mut measured_rx) = mpsc::channel::<Measured>(8);
    let mut autoplay: Option<Interval> = None;

    let effects = state.finish_loading(screenshots);
    perform_effects(effects, &state, &mut autoplay, &opts, &probe, &measured_tx);
    state_tx.send_replace(state.clone());

    loop {
        select! {
            _ = cancel.cancelled() => {
                info!("cancel received; stopping slideshow controller");
                break;
            }

            _ = autoplay_tick(&mut autoplay) => {
                let effects = state.next_slide();
                perform_effects(effects, &state, &mut autoplay, &opts, &probe, &measured_tx);
                state_tx.send_replace(state.clone());
            }

            maybe_event = events_rx.recv() => {
                let Some(event) = maybe_event else {
                    debug!("event channel closed; stopping slideshow controller");
                    break;
                };
                debug!(?event, "controller event");
                let effects = state.handle_event(event);
                perform_effects(effects, &state, &mut autoplay, &opts, &probe, &measured_tx);
                state_tx.send_replace(state.clone());
            }

            Some(measured) = measured_rx.recv() => {
                if state.apply_measurement(measured) {
                    debug!(
                        width = state.container_width,
                        height = state.container_height,
                        "slide dimensions updated"
                    );
                    state_tx.send_replace(state.clone());
                } else {
                    debug!(load_id = measured.load_id, "stale dimension measurement discarded");
                }
            }
        }
    }

    Ok(())
}

/// Await the next autoplay tick; pends forever while no timer is live.
async fn autoplay_tick(autoplay: &mut Option<Interval>) {
    match autoplay {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

fn perform_effects<P: DimensionProbe>(
    effects: Vec<Effect>,
    state: &SlideshowState,
    autoplay: &mut Option<Interval>,
    opts: &ControllerOptions,
    probe: &P,
    measured_tx: &Sender<Measured>,
) {
    for effect in effects {
        match effect {
            Effect::StopAutoplay => *autoplay = None,
            Effect::RestartAutoplay => {
                start_autoplay(autoplay, state, opts.autoplay_interval);
            }
            Effect::Measure { index, load_id } => {
                let Some(path) = state.screenshots.get(index).map(String::clone) else {
                    continue;
                };
                let probe = probe.clone();
                let measured_tx = measured_tx.clone();
                tokio::spawn(async move {
                    match probe.natural_size(&path).await {
                        Ok((natural_width, natural_height)) => {
                            let _ = measured_tx
                                .send(Measured {
                                    load_id,
                                    natural_width,
                                    natural_height,
                                })
                                .await;
                        }
                        Err(err) => {
                            debug!(path = %path, error = %err, "dimension probe failed");
                        }
                    }
                });
            }
        }
    }
}

/// Clear before set: at most one live timer per controller, and none while
/// paused or while the gallery is empty.
fn start_autoplay(autoplay: &mut Option<Interval>, state: &SlideshowState, period: Duration) {
    *autoplay = None;
    if state.is_paused || state.screenshots.is_empty() {
        return;
    }
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    *autoplay = Some(interval);
}
