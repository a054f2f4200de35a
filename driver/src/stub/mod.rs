pub mod figure;
pub mod server;
