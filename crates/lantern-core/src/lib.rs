pub mod error;
pub mod gateway;
pub mod model;
pub mod ordering;
pub mod platform;

// Re-export common error type
pub use error::LanternError;
