//! HTTP handlers

pub mod dev;

pub use dev::{router, serve, DevError, DevState, ScaffoldData, ScaffoldRequest};
