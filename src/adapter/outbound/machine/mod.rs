//! Host directory backed by a docker-machine store.
//!
//! - [`record`]: typed view of a machine's `config.json`
//! - [`store`]: `HostDirectory` over `<storage>/machines/<name>/`

pub mod record;
pub mod store;
