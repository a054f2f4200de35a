use crate::model::PlotResponse;
use serde_json::Value;

/// Liveness badge; resolved once per mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Checking => "Checking...",
            HealthStatus::Online => "Online",
            HealthStatus::Offline => "Offline",
        }
    }
}

/// Progress of the most recent submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Inputs to the view state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    HealthResolved(bool),
    SubmitStarted,
    PlotReceived(Value),
    PlotFailed(String),
}

/// Snapshot of everything the page shows.
///
/// Never mutated in place: [`ViewState::apply`] returns the next snapshot.
/// The last good plot survives later failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    health: HealthStatus,
    phase: Phase,
    plot: Option<PlotResponse>,
}

impl ViewState {
    pub fn health(&self) -> HealthStatus {
        self.health
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn plot(&self) -> Option<&PlotResponse> {
        self.plot.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn apply(&self, event: ViewEvent) -> ViewState {
        match event {
            ViewEvent::HealthResolved(online) => {
                if self.health != HealthStatus::Checking {
                    return self.clone();
                }
                ViewState {
                    health: if online {
                        HealthStatus::Online
                    } else {
                        HealthStatus::Offline
                    },
                    ..self.clone()
                }
            }
            ViewEvent::SubmitStarted => ViewState {
                phase: Phase::Loading,
                ..self.clone()
            },
            ViewEvent::PlotReceived(raw) => match PlotResponse::from_value(raw) {
                Ok(plot) => ViewState {
                    phase: Phase::Success,
                    plot: Some(plot),
                    ..self.clone()
                },
                Err(err) => ViewState {
                    phase: Phase::Error(err.user_message()),
                    ..self.clone()
                },
            },
            ViewEvent::PlotFailed(message) => ViewState {
                phase: Phase::Error(message),
                ..self.clone()
            },
        }
    }
}
