use crate::builder::{RequestBuilder, RequestForm};
use crate::model::PlotRequest;
use crate::prelude::INVALID_PLOT_DATA;
use crate::telemetry::log::LogManager;
use crate::view::state::{ViewEvent, ViewState};
use serde_json::Value;

/// Work the host must perform after a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    CheckHealth,
    Dispatch(PlotRequest),
    Alert(String),
}

/// Counts of submissions in this session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Drives [`ViewState`] from user actions and service replies.
///
/// The controller never touches the network; it hands back an [`Effect`]
/// and expects the outcome through [`ViewController::resolve_health`] or
/// [`ViewController::receive`].
pub struct ViewController {
    state: ViewState,
    builder: RequestBuilder,
    logger: LogManager,
    stats: SessionStats,
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            state: ViewState::default(),
            builder: RequestBuilder::new(),
            logger: LogManager::new(),
            stats: SessionStats::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The UI guard against double submission.
    pub fn can_submit(&self) -> bool {
        !self.state.is_loading()
    }

    pub fn mount(&mut self) -> Effect {
        self.logger.record("view mounted, checking plot service");
        Effect::CheckHealth
    }

    pub fn resolve_health(&mut self, outcome: Result<(), String>) -> Effect {
        if let Err(reason) = &outcome {
            self.logger.record(&format!("health check failed: {reason}"));
        }
        self.logger.health(outcome.is_ok());
        self.state = self.state.apply(ViewEvent::HealthResolved(outcome.is_ok()));
        Effect::None
    }

    /// Validates the form; only a complete request moves the view to loading.
    pub fn submit(&mut self, form: &RequestForm) -> Effect {
        match self.builder.build(form) {
            Ok(request) => {
                self.logger
                    .dispatched(request.path.len(), request.kpoints.len());
                self.stats.dispatched += 1;
                self.state = self.state.apply(ViewEvent::SubmitStarted);
                Effect::Dispatch(request)
            }
            Err(err) => {
                self.logger.validation_failed(&err.to_string());
                Effect::Alert(err.alert_text())
            }
        }
    }

    pub fn receive(&mut self, outcome: Result<Value, String>) -> Effect {
        let event = match outcome {
            Ok(raw) => ViewEvent::PlotReceived(raw),
            Err(message) => {
                self.logger.request_failed(&message);
                ViewEvent::PlotFailed(message)
            }
        };
        let received = matches!(event, ViewEvent::PlotReceived(_));
        self.state = self.state.apply(event);

        if self.state.error().is_some() {
            if received {
                self.logger.shape_rejected(INVALID_PLOT_DATA);
            }
            self.stats.failed += 1;
        } else {
            self.stats.succeeded += 1;
        }
        Effect::None
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LatticeInput;
    use crate::view::state::{HealthStatus, Phase};
    use serde_json::json;

    fn figure() -> Value {
        json!({"data": [{"type": "mesh3d"}], "layout": {"scene": {}}})
    }

    #[test]
    fn mount_requests_health_check() {
        let mut controller = ViewController::new();
        assert_eq!(controller.mount(), Effect::CheckHealth);
        assert_eq!(controller.state().health(), HealthStatus::Checking);
        controller.resolve_health(Err("connection refused".into()));
        assert_eq!(controller.state().health(), HealthStatus::Offline);
    }

    #[test]
    fn invalid_form_never_dispatches() {
        let mut controller = ViewController::new();
        let mut form = RequestForm::default();
        form.lattice = LatticeInput::from_text("[[0, 0.5, 0.5]");
        let effect = controller.submit(&form);
        assert!(matches!(effect, Effect::Alert(_)));
        assert_eq!(controller.state().phase(), &Phase::Idle);
        assert_eq!(controller.stats().dispatched, 0);
        assert!(controller.can_submit());
    }

    #[test]
    fn valid_form_dispatches_and_blocks_resubmit() {
        let mut controller = ViewController::new();
        let effect = controller.submit(&RequestForm::default());
        assert!(matches!(effect, Effect::Dispatch(_)));
        assert!(controller.state().is_loading());
        assert!(!controller.can_submit());

        controller.receive(Ok(figure()));
        assert_eq!(controller.state().phase(), &Phase::Success);
        assert!(controller.can_submit());
        assert_eq!(controller.stats().succeeded, 1);
    }

    #[test]
    fn malformed_response_counts_as_failure() {
        let mut controller = ViewController::new();
        controller.submit(&RequestForm::default());
        controller.receive(Ok(json!({"layout": {}})));
        assert_eq!(controller.state().error(), Some(INVALID_PLOT_DATA));
        assert!(controller.state().plot().is_none());
        assert_eq!(controller.stats().failed, 1);
    }

    #[test]
    fn repeated_submissions_are_independent() {
        let mut controller = ViewController::new();
        for round in 0..2 {
            let effect = controller.submit(&RequestForm::default());
            let Effect::Dispatch(request) = effect else {
                panic!("expected dispatch");
            };
            assert_eq!(request.path.len(), 6);
            let raw = json!({"data": [], "layout": {"round": round}});
            controller.receive(Ok(raw.clone()));
            assert_eq!(controller.state().plot().unwrap().as_value(), &raw);
        }
        assert_eq!(controller.stats().dispatched, 2);
        assert_eq!(controller.stats().succeeded, 2);
    }
}
