use std::fmt;

use serde::Serialize;

/// Informational signal raised while generating.
///
/// Serialized with an `event` tag, e.g.
/// `{"event": "fallback_triggered", "missing_token": "ef", "chosen_token": "ab"}`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiagnosticEvent {
	/// The current token has no outgoing transition; generation continued
	/// from `chosen_token`, picked by the fallback policy.
	FallbackTriggered {
		missing_token: String,
		chosen_token: String,
	},
}

impl fmt::Display for DiagnosticEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DiagnosticEvent::FallbackTriggered { missing_token, chosen_token } => write!(
				f,
				"token {missing_token:?} not in model, continuing from {chosen_token:?}"
			),
		}
	}
}

/// Receiver of [`DiagnosticEvent`]s.
///
/// The generator never logs by itself; callers decide what to do with events.
pub trait DiagnosticsSink {
	fn record(&mut self, event: DiagnosticEvent);
}

/// Collects every event, in order.
impl DiagnosticsSink for Vec<DiagnosticEvent> {
	fn record(&mut self, event: DiagnosticEvent) {
		self.push(event);
	}
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl DiagnosticsSink for Discard {
	fn record(&mut self, _event: DiagnosticEvent) {}
}
