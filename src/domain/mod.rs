//! Engine-agnostic cluster domain: hosts, container specs and discovery math.

pub mod container;
pub mod discovery;
pub mod error;
pub mod host;
pub mod id;
pub mod role;
pub mod service;
