//! Common utilities and types shared across routeguide

pub mod config;
pub mod error;
pub mod geo;

pub use config::{Config, ServerConfig};
pub use error::{Error, Result};
pub use geo::{contains, distance, validate_point, validate_rectangle, Bounds};
