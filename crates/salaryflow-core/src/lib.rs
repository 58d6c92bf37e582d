// Library root: re-exports all modules so integration tests and the CLI can
// reach the crate's public API.

pub mod config;
pub mod data;
pub mod drilldown;
pub mod engine;
pub mod pipeline;
pub mod summary;
pub mod team_batting;
