//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (host directories, container engines) or that inbound adapters
//! drive (the operator surface used by the CLI).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                                                       ▼
//! ┌───────────────┐                                    ┌────────────┐
//! │ HostDirectory │                                    │   Engine   │
//! │   Adapter     │                                    │  Adapter   │
//! └───────────────┘                                    └────────────┘
//! ```

pub mod inbound;
pub mod outbound;
