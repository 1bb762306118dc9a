//! Accumulated rest time and the history of resolved sessions.

use crate::common::SessionId;
use crate::events::Resolution;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// One resolved rest session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionRecord {
    pub session: SessionId,
    /// Wall-clock time at which the notification was shown.
    pub started_at: DateTime<Utc>,
    /// Measured time from show to resolution, unrounded.
    pub duration: Duration,
    pub resolution: Resolution,
}

/// A snapshot of the scheduler's statistics.
///
/// `total_rest` only reflects resolved sessions: the elapsed time of a session
/// that is still active is not included until it is resolved as rested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestStatistics {
    total_rest: Duration,
    sessions: Vec<SessionRecord>,
}

impl RestStatistics {
    /// Total rest time of every session resolved as `Rested`.
    pub fn total_rest(&self) -> Duration {
        self.total_rest
    }

    /// Resolved sessions, oldest first.
    pub fn sessions(&self) -> &[SessionRecord] {
        &self.sessions
    }

    pub fn rested_count(&self) -> usize {
        self.count(Resolution::Rested)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(Resolution::Skipped)
    }

    pub fn last_session(&self) -> Option<&SessionRecord> {
        self.sessions.last()
    }

    fn count(&self, resolution: Resolution) -> usize {
        self.sessions
            .iter()
            .filter(|record| record.resolution == resolution)
            .count()
    }

    /// Appends a resolved session. Only rested sessions grow the total.
    pub(crate) fn record(&mut self, record: SessionRecord) {
        if record.resolution == Resolution::Rested {
            self.total_rest += record.duration;
        }
        self.sessions.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, secs: u64, resolution: Resolution) -> SessionRecord {
        SessionRecord {
            session: SessionId(id),
            started_at: Utc::now(),
            duration: Duration::from_secs(secs),
            resolution,
        }
    }

    #[test]
    fn starts_empty() {
        let stats = RestStatistics::default();
        assert_eq!(stats.total_rest(), Duration::ZERO);
        assert!(stats.sessions().is_empty());
        assert!(stats.last_session().is_none());
    }

    #[test]
    fn only_rested_sessions_count_toward_total() {
        let mut stats = RestStatistics::default();
        stats.record(record(1, 2, Resolution::Rested));
        stats.record(record(2, 4, Resolution::Skipped));
        stats.record(record(3, 7, Resolution::Rested));

        assert_eq!(stats.total_rest(), Duration::from_secs(9));
        assert_eq!(stats.rested_count(), 2);
        assert_eq!(stats.skipped_count(), 1);
        assert_eq!(stats.sessions().len(), 3);
        assert_eq!(stats.last_session().map(|r| r.session), Some(SessionId(3)));
    }

    #[test]
    fn keeps_sub_second_precision() {
        let mut stats = RestStatistics::default();
        let mut first = record(1, 1, Resolution::Rested);
        first.duration = Duration::from_millis(1_400);
        let mut second = record(2, 1, Resolution::Rested);
        second.duration = Duration::from_millis(1_400);
        stats.record(first);
        stats.record(second);
        assert_eq!(stats.total_rest(), Duration::from_millis(2_800));
    }

    #[test]
    fn serializes_for_export() {
        let mut stats = RestStatistics::default();
        stats.record(record(4, 5, Resolution::Rested));
        stats.record(record(5, 2, Resolution::Skipped));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["total_rest"]["secs"], 5);
        assert_eq!(json["sessions"][0]["session"], 4);
        assert_eq!(json["sessions"][0]["resolution"], "rested");
        assert_eq!(json["sessions"][1]["resolution"], "skipped");
        assert!(json["sessions"][1]["started_at"].is_string());
    }
}
