//! Container engine adapter over the Docker remote API.
//!
//! - [`client`]: `EngineClient` backed by `bollard`
//! - [`connector`]: builds TLS or plain HTTP clients per endpoint
//! - [`convert`]: container spec and error translation

pub mod client;
pub mod connector;
pub mod convert;
