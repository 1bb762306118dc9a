//! The scheduler object that owns the rest cycle.

use crate::components::cycle::CycleLoop;
use crate::components::session::SessionOutputs;
use crate::components::stats::RestStatistics;
use crate::config::RestConfig;
use crate::events::{DisplayEvent, Signal, SystemEvent};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tracing::{info, warn};

/// The rest-cycle scheduler.
///
/// This struct is the single point of control for a rest cycle. It holds the
/// configuration, the inbound signal channel, the outbound event streams and
/// the statistics snapshot. It is designed to be cloned and shared: one clone
/// drives `run`, others send user signals or read statistics.
///
/// Every session ends with exactly one resolution (`user_continued` or
/// `user_skipped`), each of which also sends the `StartNext` that arms the
/// following cycle.
#[derive(Clone)]
pub struct RestScheduler {
    config: Arc<RestConfig>,
    signal_sender: mpsc::UnboundedSender<Signal>,
    signal_receiver: Arc<Mutex<Option<mpsc::UnboundedReceiver<Signal>>>>,
    display_event_sender: broadcast::Sender<DisplayEvent>,
    system_event_sender: broadcast::Sender<SystemEvent>,
    stats: Arc<watch::Sender<RestStatistics>>,
}

// Lifecycle.
impl RestScheduler {
    /// Creates a new scheduler with the given configuration. Nothing runs until `run`.
    pub fn new(config: RestConfig) -> Self {
        const CHANNEL_CAPACITY: usize = 64;
        let (signal_sender, signal_receiver) = mpsc::unbounded_channel();
        let (display_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (system_event_sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (stats, _) = watch::channel(RestStatistics::default());

        Self {
            config: Arc::new(config),
            signal_sender,
            signal_receiver: Arc::new(Mutex::new(Some(signal_receiver))),
            display_event_sender,
            system_event_sender,
            stats: Arc::new(stats),
        }
    }

    /// Runs the Cycle Loop until a `UserExited` signal is received.
    ///
    /// Signals sent before `run` is called are queued and processed once the
    /// loop starts. A scheduler can only be run once.
    pub async fn run(&self) -> anyhow::Result<()> {
        let signals = self
            .signal_receiver
            .lock()
            .await
            .take()
            .ok_or_else(|| anyhow::anyhow!("RestScheduler is already running or has finished"))?;

        info!(
            "Rest timer interval set to {:?}.",
            self.config.interval.as_duration()
        );
        let cycle = CycleLoop::new(
            self.config.interval,
            self.config.notification_text.clone(),
            signals,
            SessionOutputs {
                display: self.display_event_sender.clone(),
                system: self.system_event_sender.clone(),
                stats: self.stats.clone(),
            },
        );
        cycle.run().await;
        info!("Rest scheduler has shut down.");
        Ok(())
    }

    pub fn config(&self) -> &RestConfig {
        &self.config
    }
}

// Inbound signals.
impl RestScheduler {
    /// The user took the rest: count it, then arm the next cycle.
    pub fn user_continued(&self) {
        self.send_signal(Signal::Stop);
        self.send_signal(Signal::StartNext);
    }

    /// The user dismissed the rest: discard it, then arm the next cycle.
    pub fn user_skipped(&self) {
        self.send_signal(Signal::Skip);
        self.send_signal(Signal::StartNext);
    }

    /// The user asked to quit. Rest time of an unresolved session is lost.
    pub fn user_exited(&self) {
        self.send_signal(Signal::Exit);
    }

    /// The user asked for a rest now, ahead of the timer.
    pub fn start_rest(&self) {
        self.send_signal(Signal::StartRest);
    }

    /// Sends a single raw signal.
    ///
    /// Prefer the `user_*` methods, which keep resolutions paired with
    /// `StartNext`. Signals the Cycle Loop cannot accept in its current state
    /// are reported as `SystemEvent::ProtocolViolation`.
    pub fn send_signal(&self, signal: Signal) {
        if self.signal_sender.send(signal).is_err() {
            warn!("Dropped '{}' signal: the scheduler is no longer running.", signal);
        }
    }
}

// Outbound streams and statistics.
impl RestScheduler {
    /// Returns a consistent snapshot of the statistics.
    ///
    /// The accumulated total only includes resolved sessions.
    pub fn stats(&self) -> RestStatistics {
        self.stats.borrow().clone()
    }

    /// Subscribes to statistics changes. The receiver always holds the latest snapshot.
    pub fn watch_stats(&self) -> watch::Receiver<RestStatistics> {
        self.stats.subscribe()
    }

    /// Subscribes to the `DisplayEvent` stream.
    pub fn subscribe_display_events(&self) -> broadcast::Receiver<DisplayEvent> {
        self.display_event_sender.subscribe()
    }

    /// Subscribes to the `SystemEvent` stream.
    pub fn subscribe_system_events(&self) -> broadcast::Receiver<SystemEvent> {
        self.system_event_sender.subscribe()
    }
}
