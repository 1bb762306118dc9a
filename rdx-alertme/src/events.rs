//! Defines every message that crosses the scheduler boundary.
//!
//! Inbound, the presentation layer sends payload-free `Signal`s. Outbound, the
//! scheduler broadcasts `DisplayEvent`s (effects the presentation layer should
//! render) and `SystemEvent`s (lifecycle and anomaly reports).

use crate::common::{SessionId, SessionTrigger};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// An occurrence sent from the presentation layer to the Cycle Loop.
///
/// Signals carry no data. Whether one is accepted depends solely on the state
/// the Cycle Loop is in when it arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// End the active session and count its duration.
    Stop,
    /// End the active session without counting it.
    Skip,
    /// Arm the next cycle after a session has been resolved.
    StartNext,
    /// Begin a session now instead of waiting for the timer.
    StartRest,
    /// Terminate the scheduler. In-flight rest time is discarded.
    Exit,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Stop => "stop",
            Signal::Skip => "skip",
            Signal::StartNext => "start-next",
            Signal::StartRest => "start-rest",
            Signal::Exit => "exit",
        };
        f.write_str(name)
    }
}

/// How a rest session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// The user took the rest; its duration is added to the total.
    Rested,
    /// The user dismissed the notification; nothing is counted.
    Skipped,
}

/// The externally visible state of the Cycle Loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Waiting for the cycle timer.
    Armed,
    /// A session is live and waiting for its resolution.
    SessionActive,
    /// The session has been resolved; waiting for `StartNext`.
    AwaitingNext,
}

/// Effects the presentation layer is asked to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    /// Show the rest prompt. Sent once when a session begins.
    ShowNotification { session: SessionId, message: String },
    /// Dismiss the rest prompt. Sent once when a session is resolved.
    HideNotification { session: SessionId },
    /// The live duration of the active session, at most once per second.
    ElapsedUpdated {
        session: SessionId,
        elapsed: Duration,
        text: String,
    },
    /// The new running total, once per `Rested` resolution.
    AccumulatedUpdated { total: Duration, text: String },
}

/// Events describing the scheduler's own lifecycle.
#[derive(Debug, Clone)]
pub enum SystemEvent {
    /// Fired once when the Cycle Loop begins.
    SchedulerStarted { interval: Duration },
    /// Fired every time a fresh cycle timer is armed.
    CycleArmed { deadline: Instant },
    /// Fired when a session begins.
    SessionStarted {
        session: SessionId,
        trigger: SessionTrigger,
    },
    /// Fired when a session's Session Loop finishes its accounting.
    SessionResolved {
        session: SessionId,
        resolution: Resolution,
        elapsed: Duration,
    },
    /// Fired when the scheduler exits while a session is still open.
    SessionAbandoned { session: SessionId },
    /// A signal arrived while the Cycle Loop could not accept it. It was ignored.
    ProtocolViolation { signal: Signal, phase: CyclePhase },
    /// Fired once when the Cycle Loop is about to exit.
    SchedulerShutdown { total_rest: Duration },
}
