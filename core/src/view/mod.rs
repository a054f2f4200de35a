pub mod controller;
pub mod state;

pub use controller::{Effect, SessionStats, ViewController};
pub use state::{HealthStatus, Phase, ViewEvent, ViewState};
