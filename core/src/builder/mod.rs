pub mod form;
pub mod request_builder;

pub use form::{LatticeInput, LatticeMode, RequestForm};
pub use request_builder::RequestBuilder;
