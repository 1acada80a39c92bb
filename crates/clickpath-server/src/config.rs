/// Re-export `Config` from `clickpath-core` for use within this crate.
///
/// Environment parsing lives in `clickpath-core` so integration tests can
/// build a `Config` without depending on the server.
pub use clickpath_core::config::Config;
