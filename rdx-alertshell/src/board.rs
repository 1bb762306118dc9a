//! The terminal stand-in for the rest window's labels.

use alertme::prelude::*;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

/// Receives the next event, skipping over any the listener fell behind on.
///
/// Returns `None` only once the scheduler has dropped the stream.
pub async fn next_event<T: Clone>(rx: &mut broadcast::Receiver<T>) -> Option<T> {
    loop {
        match rx.recv().await {
            Ok(event) => return Some(event),
            Err(RecvError::Lagged(missed)) => {
                debug!("Listener fell behind; skipped {} events.", missed);
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

/// What the rest window would currently be showing.
#[derive(Debug, Clone)]
pub struct DisplayBoard {
    pub visible: Option<SessionId>,
    pub message: String,
    pub rest_duration: String,
    pub total_rest: String,
}

impl Default for DisplayBoard {
    fn default() -> Self {
        Self {
            visible: None,
            message: String::new(),
            rest_duration: "Rest Duration: 0s".to_string(),
            total_rest: "Total Rest Time: 0s".to_string(),
        }
    }
}

impl DisplayBoard {
    pub fn apply(&mut self, event: &DisplayEvent) {
        match event {
            DisplayEvent::ShowNotification { session, message } => {
                self.visible = Some(*session);
                self.message = message.clone();
            }
            DisplayEvent::HideNotification { .. } => self.visible = None,
            DisplayEvent::ElapsedUpdated { text, .. } => self.rest_duration = text.clone(),
            DisplayEvent::AccumulatedUpdated { text, .. } => self.total_rest = text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn tracks_labels_and_visibility() {
        let mut board = DisplayBoard::default();
        board.apply(&DisplayEvent::ShowNotification {
            session: SessionId(1),
            message: "rest".to_string(),
        });
        board.apply(&DisplayEvent::ElapsedUpdated {
            session: SessionId(1),
            elapsed: Duration::from_secs(3),
            text: "Rest Duration: 3s".to_string(),
        });
        assert_eq!(board.visible, Some(SessionId(1)));
        assert_eq!(board.rest_duration, "Rest Duration: 3s");

        board.apply(&DisplayEvent::AccumulatedUpdated {
            total: Duration::from_secs(3),
            text: "Total Rest Time: 3s".to_string(),
        });
        board.apply(&DisplayEvent::HideNotification {
            session: SessionId(1),
        });
        assert_eq!(board.visible, None);
        assert_eq!(board.total_rest, "Total Rest Time: 3s");
    }

    #[tokio::test]
    async fn listener_survives_falling_behind() {
        let (tx, mut rx) = broadcast::channel(2);
        for n in 0..5u32 {
            tx.send(n).unwrap();
        }
        assert_eq!(next_event(&mut rx).await, Some(3));
        assert_eq!(next_event(&mut rx).await, Some(4));

        tx.send(5).unwrap();
        assert_eq!(next_event(&mut rx).await, Some(5));

        drop(tx);
        assert_eq!(next_event(&mut rx).await, None);
    }
}
