// Library root: re-exports the CLI's modules so integration tests can reach
// config loading, the season store, and the renderers.

pub mod config;
pub mod render;
pub mod store;
