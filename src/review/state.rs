//! Review widget lifecycle
//!
//! ```text
//! Uninitialized --initialize--> Initialized --partial*--> Streaming
//! Streaming --tool-input/tool-result--> Ready --apply--> Applying
//! Applying --apply ok--> Applied { persisted: false } --persist ok--> Applied { persisted: true }
//! ```
//!
//! Persisted state may arrive at any point (and out of order after a page
//! refresh). An applied payload is never replaced by a non-applied one, and
//! the payload is frozen while an apply is in flight.

use super::models::{ReviewPayload, ToolStatus, GENERIC_FAILURE};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewPhase {
    #[default]
    Uninitialized,
    Initialized,
    Streaming,
    Ready,
    Applying,
    Applied {
        persisted: bool,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewState {
    pub phase: ReviewPhase,
    pub tool_status: ToolStatus,
    pub payload: Option<ReviewPayload>,
    pub status: Option<String>,
}

impl ReviewState {
    pub fn is_applied(&self) -> bool {
        self.payload.as_ref().is_some_and(|p| p.applied)
    }

    /// No payload changes are accepted in these phases.
    fn is_locked(&self) -> bool {
        self.phase == ReviewPhase::Applying || self.is_applied()
    }

    pub fn initialize(&mut self) {
        if self.phase == ReviewPhase::Uninitialized {
            self.phase = ReviewPhase::Initialized;
        }
    }

    /// Streaming arguments; fields may still be incomplete.
    pub fn tool_input_partial(&mut self, payload: ReviewPayload) {
        if self.is_locked() {
            return;
        }
        self.phase = ReviewPhase::Streaming;
        self.tool_status = ToolStatus::Streaming;
        self.payload = Some(payload);
    }

    /// Final arguments or a tool result carrying the payload.
    pub fn tool_complete(&mut self, payload: Option<ReviewPayload>) {
        self.tool_status = ToolStatus::Complete;
        if self.is_locked() {
            return;
        }
        if let Some(payload) = payload {
            self.payload = Some(payload);
        }
        if self.payload.is_some() {
            self.phase = ReviewPhase::Ready;
        }
    }

    /// Merges state persisted by the host.
    ///
    /// Returns whether anything changed.
    pub fn merge_persisted(&mut self, incoming: ReviewPayload) -> bool {
        if self.phase == ReviewPhase::Applying {
            debug!("ignoring persisted state during apply");
            return false;
        }
        if self.is_applied() && !incoming.applied {
            debug!("ignoring stale non-applied state");
            return false;
        }
        if self.payload.as_ref() == Some(&incoming) {
            if incoming.applied {
                self.phase = ReviewPhase::Applied { persisted: true };
            }
            return false;
        }

        let applied = incoming.applied;
        self.payload = Some(incoming);
        if applied {
            self.phase = ReviewPhase::Applied { persisted: true };
            self.tool_status = ToolStatus::Complete;
        } else if matches!(
            self.phase,
            ReviewPhase::Uninitialized | ReviewPhase::Initialized
        ) {
            self.phase = ReviewPhase::Ready;
        }
        true
    }

    /// Moves `Ready` to `Applying`, handing back the payload to apply.
    pub fn begin_apply(&mut self) -> Option<ReviewPayload> {
        if self.phase != ReviewPhase::Ready {
            return None;
        }
        let payload = self.payload.clone()?;
        self.phase = ReviewPhase::Applying;
        self.status = Some("Applying…".to_string());
        Some(payload)
    }

    pub fn apply_succeeded(&mut self) {
        if self.phase != ReviewPhase::Applying {
            return;
        }
        if let Some(payload) = self.payload.as_mut() {
            payload.applied = true;
        }
        self.phase = ReviewPhase::Applied { persisted: false };
        self.status = Some("Applied".to_string());
    }

    pub fn apply_failed(&mut self) {
        if self.phase == ReviewPhase::Applying {
            self.phase = ReviewPhase::Ready;
        }
        self.status = Some(GENERIC_FAILURE.to_string());
    }

    pub fn persist_succeeded(&mut self) {
        if matches!(self.phase, ReviewPhase::Applied { .. }) {
            self.phase = ReviewPhase::Applied { persisted: true };
        }
    }

    pub fn persist_failed(&mut self) {
        self.status = Some(GENERIC_FAILURE.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(applied: bool) -> ReviewPayload {
        ReviewPayload {
            before: "teh cat".into(),
            after: "the cat".into(),
            summary: Some("typo".into()),
            canvas_id: Some("doc-1".into()),
            applied,
        }
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut state = ReviewState::default();
        state.initialize();
        assert_eq!(state.phase, ReviewPhase::Initialized);

        state.tool_input_partial(ReviewPayload {
            before: "teh".into(),
            ..Default::default()
        });
        assert_eq!(state.phase, ReviewPhase::Streaming);
        assert_eq!(state.tool_status, ToolStatus::Streaming);

        state.tool_complete(Some(payload(false)));
        assert_eq!(state.phase, ReviewPhase::Ready);
        assert_eq!(state.tool_status, ToolStatus::Complete);

        let to_apply = state.begin_apply().unwrap();
        assert_eq!(to_apply.after, "the cat");
        assert_eq!(state.phase, ReviewPhase::Applying);
        assert!(state.begin_apply().is_none());

        state.apply_succeeded();
        assert_eq!(state.phase, ReviewPhase::Applied { persisted: false });
        assert!(state.is_applied());

        state.persist_succeeded();
        assert_eq!(state.phase, ReviewPhase::Applied { persisted: true });
    }

    #[test]
    fn test_apply_failure_returns_to_ready() {
        let mut state = ReviewState::default();
        state.tool_complete(Some(payload(false)));
        state.begin_apply().unwrap();
        state.apply_failed();
        assert_eq!(state.phase, ReviewPhase::Ready);
        assert_eq!(state.status.as_deref(), Some(GENERIC_FAILURE));
        assert!(!state.is_applied());
    }

    #[test]
    fn test_applied_is_never_regressed() {
        let mut state = ReviewState::default();
        assert!(state.merge_persisted(payload(true)));
        assert_eq!(state.phase, ReviewPhase::Applied { persisted: true });

        // Stale state from before the apply arrives late.
        assert!(!state.merge_persisted(payload(false)));
        assert!(state.is_applied());

        // Same applied state twice is a no-op.
        assert!(!state.merge_persisted(payload(true)));
        assert!(state.is_applied());

        // Late tool notifications do not reset it either.
        state.tool_input_partial(payload(false));
        state.tool_complete(Some(payload(false)));
        assert!(state.is_applied());
        assert_eq!(state.phase, ReviewPhase::Applied { persisted: true });
    }

    #[test]
    fn test_payload_is_frozen_while_applying() {
        let mut state = ReviewState::default();
        state.tool_complete(Some(payload(false)));
        state.begin_apply().unwrap();

        let other = ReviewPayload {
            before: "dog".into(),
            after: "cow".into(),
            ..Default::default()
        };
        state.tool_input_partial(other.clone());
        state.tool_complete(Some(other.clone()));
        assert!(!state.merge_persisted(other));
        assert_eq!(state.phase, ReviewPhase::Applying);
        assert!(state.begin_apply().is_none());

        state.apply_succeeded();
        let applied = state.payload.as_ref().unwrap();
        assert_eq!(applied.after, "the cat");
        assert!(applied.applied);
    }

    #[test]
    fn test_non_applied_state_restores_ready() {
        let mut state = ReviewState::default();
        state.initialize();
        assert!(state.merge_persisted(payload(false)));
        assert_eq!(state.phase, ReviewPhase::Ready);
    }
}
