use log::{debug, error, info, warn};

/// Log target for responses that arrived but could not be drawn.
pub const SHAPE_TARGET: &str = "bzcore::shape";

/// Lifecycle logging for a plot session, one method per event kind.
#[derive(Debug, Clone, Copy)]
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn health(&self, online: bool) {
        if online {
            info!("plot service online");
        } else {
            warn!("plot service offline");
        }
    }

    pub fn validation_failed(&self, reason: &str) {
        warn!("request not sent: {}", reason);
    }

    pub fn unresolved_labels(&self, labels: &[&str]) {
        warn!(
            "path labels without k-point coordinates: {}",
            labels.join(", ")
        );
    }

    pub fn dispatched(&self, path_len: usize, kpoint_count: usize) {
        debug!(
            "dispatching plot request ({} path labels, {} k-points)",
            path_len, kpoint_count
        );
    }

    pub fn request_failed(&self, message: &str) {
        error!("plot request failed: {}", message);
    }

    pub fn shape_rejected(&self, message: &str) {
        error!(target: SHAPE_TARGET, "plot response rejected: {}", message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
