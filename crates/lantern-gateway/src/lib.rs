pub mod config;
pub mod http;

pub use config::GatewayConfig;
pub use http::HttpGateway;
