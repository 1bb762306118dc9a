//! The Cycle Loop: decides when a rest session starts and when the next cycle is armed.
//!
//! The loop is an explicit state machine. Each state listens only for the
//! signals it can act on; anything else is reported as a protocol violation
//! and dropped, so a miswired presentation layer cannot start overlapping
//! sessions or double-count a rest.

use crate::common::{SessionId, SessionTrigger};
use crate::components::session::{SessionLoop, SessionOutputs};
use crate::config::Interval;
use crate::events::{CyclePhase, DisplayEvent, Resolution, Signal, SystemEvent};
use crate::time::CycleTimer;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info, warn};

enum CycleState {
    Armed(CycleTimer),
    SessionActive {
        session: SessionId,
        resolution_tx: oneshot::Sender<Resolution>,
        handle: JoinHandle<()>,
    },
    AwaitingNext {
        session: SessionId,
        handle: JoinHandle<()>,
    },
}

impl CycleState {
    fn phase(&self) -> CyclePhase {
        match self {
            CycleState::Armed(_) => CyclePhase::Armed,
            CycleState::SessionActive { .. } => CyclePhase::SessionActive,
            CycleState::AwaitingNext { .. } => CyclePhase::AwaitingNext,
        }
    }
}

enum Wake {
    TimerFired,
    Signal(Option<Signal>),
}

pub(crate) struct CycleLoop {
    interval: Interval,
    notification_text: String,
    signals: mpsc::UnboundedReceiver<Signal>,
    outputs: SessionOutputs,
    next_session: SessionId,
}

impl CycleLoop {
    pub(crate) fn new(
        interval: Interval,
        notification_text: String,
        signals: mpsc::UnboundedReceiver<Signal>,
        outputs: SessionOutputs,
    ) -> Self {
        Self {
            interval,
            notification_text,
            signals,
            outputs,
            next_session: SessionId(1),
        }
    }

    /// Runs until an `Exit` signal arrives or every signal sender is gone.
    pub(crate) async fn run(mut self) {
        self.outputs
            .system
            .send(SystemEvent::SchedulerStarted {
                interval: self.interval.as_duration(),
            })
            .ok();
        let mut state = self.arm();

        loop {
            let wake = match &mut state {
                CycleState::Armed(timer) => tokio::select! {
                    biased;
                    signal = self.signals.recv() => Wake::Signal(signal),
                    _ = timer.fired() => Wake::TimerFired,
                },
                _ => Wake::Signal(self.signals.recv().await),
            };

            state = match wake {
                Wake::TimerFired => self.begin_session(SessionTrigger::Timer),
                Wake::Signal(Some(Signal::Exit)) | Wake::Signal(None) => {
                    self.shutdown(state).await;
                    return;
                }
                Wake::Signal(Some(signal)) => self.transition(state, signal).await,
            };
        }
    }

    async fn transition(&mut self, state: CycleState, signal: Signal) -> CycleState {
        match (state, signal) {
            (CycleState::Armed(_), Signal::StartRest) => {
                info!("Rest requested before the timer elapsed.");
                self.begin_session(SessionTrigger::Manual)
            }
            (CycleState::Armed(_), Signal::StartNext) => {
                self.report_violation(signal, CyclePhase::Armed);
                self.arm()
            }
            (
                CycleState::SessionActive {
                    session,
                    resolution_tx,
                    handle,
                },
                Signal::Stop | Signal::Skip,
            ) => {
                let resolution = if signal == Signal::Stop {
                    Resolution::Rested
                } else {
                    Resolution::Skipped
                };
                if resolution_tx.send(resolution).is_err() {
                    warn!("Session {} ended before its resolution was delivered.", session);
                }
                CycleState::AwaitingNext { session, handle }
            }
            (CycleState::AwaitingNext { session, handle }, Signal::StartNext) => {
                join_session(session, handle).await;
                self.arm()
            }
            (state, signal) => {
                self.report_violation(signal, state.phase());
                state
            }
        }
    }

    fn arm(&self) -> CycleState {
        let timer = CycleTimer::arm(self.interval);
        info!("Next rest in {:?}.", self.interval.as_duration());
        self.outputs
            .system
            .send(SystemEvent::CycleArmed {
                deadline: timer.deadline(),
            })
            .ok();
        CycleState::Armed(timer)
    }

    fn begin_session(&mut self, trigger: SessionTrigger) -> CycleState {
        let session = self.next_session;
        self.next_session = session.next();
        let started_at = Instant::now();

        self.outputs
            .display
            .send(DisplayEvent::ShowNotification {
                session,
                message: self.notification_text.clone(),
            })
            .ok();
        info!("Notification appeared (session {}).", session);
        self.outputs
            .system
            .send(SystemEvent::SessionStarted { session, trigger })
            .ok();

        let (resolution_tx, resolution_rx) = oneshot::channel();
        let session_loop =
            SessionLoop::new(session, started_at, resolution_rx, self.outputs.clone());
        let handle = tokio::spawn(session_loop.run());

        CycleState::SessionActive {
            session,
            resolution_tx,
            handle,
        }
    }

    fn report_violation(&self, signal: Signal, phase: CyclePhase) {
        if signal == Signal::StartNext && phase == CyclePhase::Armed {
            warn!("Received '{}' while already armed; re-arming the cycle.", signal);
        } else {
            warn!("Ignoring '{}' signal while {:?}.", signal, phase);
        }
        self.outputs
            .system
            .send(SystemEvent::ProtocolViolation { signal, phase })
            .ok();
    }

    async fn shutdown(self, state: CycleState) {
        match state {
            // Dropping the resolution sender abandons the session uncounted.
            CycleState::SessionActive {
                session,
                resolution_tx,
                handle,
            } => {
                drop(resolution_tx);
                join_session(session, handle).await;
            }
            CycleState::AwaitingNext { session, handle } => join_session(session, handle).await,
            CycleState::Armed(_) => {}
        }

        let total_rest = self.outputs.stats.borrow().total_rest();
        info!("Total rest time during the program: {:?}", total_rest);
        self.outputs
            .system
            .send(SystemEvent::SchedulerShutdown { total_rest })
            .ok();
    }
}

async fn join_session(session: SessionId, handle: JoinHandle<()>) {
    if let Err(e) = handle.await {
        error!("Session {} task failed: {}", session, e);
    }
}
