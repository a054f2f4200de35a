use crate::prelude::{RenderError, RenderResult};
use std::panic::{self, AssertUnwindSafe};

/// Try/recover wrapper around the single render call.
///
/// A failed or panicking render trips the guard; while tripped, further
/// renders are refused with the recorded fault until [`RenderGuard::reset`].
#[derive(Debug, Default)]
pub struct RenderGuard {
    fault: Option<RenderError>,
}

impl RenderGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fault(&self) -> Option<&RenderError> {
        self.fault.as_ref()
    }

    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }

    pub fn reset(&mut self) {
        self.fault = None;
    }

    pub fn run<T>(&mut self, render: impl FnOnce() -> RenderResult<T>) -> RenderResult<T> {
        if let Some(fault) = &self.fault {
            return Err(fault.clone());
        }
        let outcome = match panic::catch_unwind(AssertUnwindSafe(render)) {
            Ok(result) => result,
            Err(payload) => Err(RenderError::Panicked(panic_message(payload.as_ref()))),
        };
        if let Err(err) = &outcome {
            log::error!("render fault: {err}");
            self.fault = Some(err.clone());
        }
        outcome
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
