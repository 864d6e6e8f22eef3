//! CLI module graph.

pub mod cluster;
pub mod command;
pub mod diagnostic;
pub mod dispatch;
pub mod inspect;
pub mod operator;
pub mod output;
pub mod paths;
