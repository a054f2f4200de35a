pub mod config;
pub mod figure;
pub mod kpoints;
pub mod lattice;
pub mod request;

pub use config::VisualizationConfig;
pub use figure::PlotResponse;
pub use kpoints::{KPath, KPointMap};
pub use lattice::LatticeMatrix;
pub use request::PlotRequest;
