//! Confirmation gate for destructive actions.
//!
//! A mutation that needs user acknowledgment is parked in a [`ConfirmationGate`] together with
//! the title and subtitle to show. The gate accepts exactly one terminal response: confirming
//! hands the parked action back once, cancelling drops it.

use std::sync::Mutex;

/// A pending destructive action awaiting acknowledgment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationIntent<A> {
    pub title: String,
    pub subtitle: String,
    pub on_confirm: A,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationResponse {
    Confirmed,
    Cancelled,
}

/// Title and subtitle of the currently open intent, for the modal host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationPrompt {
    pub title: String,
    pub subtitle: String,
}

/// Holds at most one open [`ConfirmationIntent`].
#[derive(Debug)]
pub struct ConfirmationGate<A> {
    open: Mutex<Option<ConfirmationIntent<A>>>,
}

impl<A> Default for ConfirmationGate<A> {
    fn default() -> Self {
        Self {
            open: Mutex::new(None),
        }
    }
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<ConfirmationIntent<A>>> {
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Open `intent`, replacing any intent still open (the replaced one is discarded).
    pub fn raise(&self, intent: ConfirmationIntent<A>) {
        if self.slot().replace(intent).is_some() {
            tracing::debug!("replaced an unanswered confirmation");
        }
    }

    pub fn is_open(&self) -> bool {
        self.slot().is_some()
    }

    pub fn prompt(&self) -> Option<ConfirmationPrompt> {
        self.slot().as_ref().map(|i| ConfirmationPrompt {
            title: i.title.clone(),
            subtitle: i.subtitle.clone(),
        })
    }

    /// Close the gate with `response`. Returns the parked action only when confirmed; a second
    /// response, or one with nothing open, returns `None`.
    pub fn respond(&self, response: ConfirmationResponse) -> Option<A> {
        let intent = self.slot().take()?;
        match response {
            ConfirmationResponse::Confirmed => Some(intent.on_confirm),
            ConfirmationResponse::Cancelled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intent(id: i64) -> ConfirmationIntent<i64> {
        ConfirmationIntent {
            title: "Delete doctor".into(),
            subtitle: format!("Remove doctor {id}?"),
            on_confirm: id,
        }
    }

    #[test]
    fn confirm_yields_action_once() {
        let gate = ConfirmationGate::new();
        gate.raise(intent(7));
        assert!(gate.is_open());
        assert_eq!(gate.prompt().map(|p| p.subtitle), Some("Remove doctor 7?".into()));
        assert_eq!(gate.respond(ConfirmationResponse::Confirmed), Some(7));
        assert!(!gate.is_open());
        assert_eq!(gate.respond(ConfirmationResponse::Confirmed), None);
    }

    #[test]
    fn cancel_discards_action() {
        let gate = ConfirmationGate::new();
        gate.raise(intent(7));
        assert_eq!(gate.respond(ConfirmationResponse::Cancelled), None);
        assert!(!gate.is_open());
        assert_eq!(gate.respond(ConfirmationResponse::Confirmed), None);
    }

    #[test]
    fn raising_again_replaces_open_intent() {
        let gate = ConfirmationGate::new();
        gate.raise(intent(1));
        gate.raise(intent(2));
        assert_eq!(gate.respond(ConfirmationResponse::Confirmed), Some(2));
    }
}
