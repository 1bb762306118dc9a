//! # AlertMe
//!
//! A periodic break reminder for Rust.
//!
//! Every configured interval the scheduler interrupts the user with a rest
//! notification, times how long the rest lasts, and adds that time to a running
//! total once the user confirms it. The next interval only starts after the
//! user continues or skips.
//!
//! ## Core Concepts
//!
//! - **Cycle Loop**: owns the cycle timer and decides when a rest session begins
//!   and when the next cycle is armed.
//! - **Session Loop**: one per rest session. Publishes the elapsed rest time once
//!   per second and performs the accounting when the session is resolved.
//! - **Signals**: the presentation layer drives the cycle with payload-free
//!   `Signal`s. Each state of the Cycle Loop accepts only the signals that are
//!   valid for it; others are reported and ignored.
//! - **Event-Driven Output**: show/hide requests and display text are broadcast
//!   as `DisplayEvent`s; lifecycle and anomalies as `SystemEvent`s.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use alertme::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let scheduler = RestScheduler::new(RestConfig::default());
//!
//!     let mut display = scheduler.subscribe_display_events();
//!     let handle = scheduler.clone();
//!     tokio::spawn(async move {
//!         while let Ok(event) = display.recv().await {
//!             if let DisplayEvent::ShowNotification { message, .. } = event {
//!                 println!("{message}");
//!                 // Pretend the user rested and pressed "Continue".
//!                 handle.user_continued();
//!             }
//!         }
//!     });
//!
//!     scheduler.run().await
//! }
//! ```

pub const ENGINE_NAME: &str = "AlertMe";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod time;

/// A prelude module for easy importing of the most common AlertMe types.
pub mod prelude {
    pub use crate::common::{SessionId, SessionTrigger};
    pub use crate::components::stats::{RestStatistics, SessionRecord};
    pub use crate::config::{ConfigOverrides, Interval, RestConfig};
    pub use crate::engine::RestScheduler;
    pub use crate::error::ConfigError;
    pub use crate::events::{CyclePhase, DisplayEvent, Resolution, Signal, SystemEvent};
    pub use crate::time::format_duration;
}
