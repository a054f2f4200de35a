//! Client core for the Brillouin zone visualizer.
//!
//! Builds plot requests from form input, talks to the remote plot service,
//! tracks what the page should show, and turns returned figures into
//! drawable or exportable scenes. All zone geometry is computed server-side.

pub mod builder;
pub mod client;
pub mod math;
pub mod model;
pub mod prelude;
pub mod render;
pub mod telemetry;
pub mod view;

pub use builder::{RequestBuilder, RequestForm};
pub use client::{ApiClient, ClientConfig};
pub use model::{PlotRequest, PlotResponse, VisualizationConfig};
pub use prelude::{ApiError, BuildError};
pub use view::{Effect, ViewController, ViewState};
