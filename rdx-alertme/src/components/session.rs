//! The Session Loop: live rest timing and resolution accounting.

use crate::common::SessionId;
use crate::components::stats::{RestStatistics, SessionRecord};
use crate::events::{DisplayEvent, Resolution, SystemEvent};
use crate::time::{format_duration, round_to_seconds, DISPLAY_REFRESH};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// The channels a Session Loop publishes through.
#[derive(Clone)]
pub(crate) struct SessionOutputs {
    pub display: broadcast::Sender<DisplayEvent>,
    pub system: broadcast::Sender<SystemEvent>,
    pub stats: Arc<watch::Sender<RestStatistics>>,
}

/// One live rest session.
///
/// Publishes the elapsed time once per `DISPLAY_REFRESH` until its resolution
/// arrives, then performs the accounting for that resolution and ends. The
/// resolution channel is single-use, so a session can be resolved at most once.
pub(crate) struct SessionLoop {
    session: SessionId,
    started_at: Instant,
    started_wall: DateTime<Utc>,
    resolution_rx: oneshot::Receiver<Resolution>,
    outputs: SessionOutputs,
}

impl SessionLoop {
    pub(crate) fn new(
        session: SessionId,
        started_at: Instant,
        resolution_rx: oneshot::Receiver<Resolution>,
        outputs: SessionOutputs,
    ) -> Self {
        Self {
            session,
            started_at,
            started_wall: Utc::now(),
            resolution_rx,
            outputs,
        }
    }

    pub(crate) async fn run(mut self) {
        let mut refresh = tokio::time::interval(DISPLAY_REFRESH);
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                resolution = &mut self.resolution_rx => {
                    match resolution {
                        Ok(resolution) => self.resolve(resolution),
                        Err(_) => self.abandon(),
                    }
                    return;
                }
                _ = refresh.tick() => self.publish_elapsed(),
            }
        }
    }

    fn publish_elapsed(&self) {
        let elapsed = self.started_at.elapsed();
        let text = format!("Rest Duration: {}", format_duration(elapsed));
        debug!("Session {} {}", self.session, text);
        self.outputs
            .display
            .send(DisplayEvent::ElapsedUpdated {
                session: self.session,
                elapsed: round_to_seconds(elapsed),
                text,
            })
            .ok();
    }

    fn resolve(&self, resolution: Resolution) {
        let elapsed = self.started_at.elapsed();
        self.outputs.stats.send_modify(|stats| {
            stats.record(SessionRecord {
                session: self.session,
                started_at: self.started_wall,
                duration: elapsed,
                resolution,
            })
        });

        match resolution {
            Resolution::Rested => {
                let total = self.outputs.stats.borrow().total_rest();
                info!("Rest duration: {:?}", elapsed);
                info!("Total rest time: {:?}", total);
                self.outputs
                    .display
                    .send(DisplayEvent::AccumulatedUpdated {
                        total,
                        text: format!("Total Rest Time: {}", format_duration(total)),
                    })
                    .ok();
            }
            Resolution::Skipped => {
                info!("Rest skipped after {:?}", elapsed);
            }
        }

        self.outputs
            .display
            .send(DisplayEvent::HideNotification {
                session: self.session,
            })
            .ok();
        self.outputs
            .system
            .send(SystemEvent::SessionResolved {
                session: self.session,
                resolution,
                elapsed,
            })
            .ok();
    }

    fn abandon(&self) {
        info!(
            "Session {} abandoned after {:?}; its rest time is not counted.",
            self.session,
            self.started_at.elapsed()
        );
        self.outputs
            .system
            .send(SystemEvent::SessionAbandoned {
                session: self.session,
            })
            .ok();
    }
}
