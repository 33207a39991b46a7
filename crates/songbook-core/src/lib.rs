pub mod context;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod query;
pub mod services;
pub mod validator;

pub use context::OpContext;
pub use errors::CoreError;
pub use validator::{ValidationErrors, Validator};
