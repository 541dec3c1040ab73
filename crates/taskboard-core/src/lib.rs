//! taskboard-core library.
//!
//! The pipeline that turns a fetched task list into a render-ready board:
//! fingerprinting, novelty detection, completion tracking, filtering, and
//! day grouping. Every outside effect (fetching, persistence, notification,
//! rendering) sits behind a trait so the whole pipeline runs headless.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums per seam, each mapped to an [`error::ErrorCode`].
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`).

pub mod completion;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod group;
pub mod model;
pub mod notify;
pub mod novelty;
pub mod source;
pub mod store;
pub mod timeago;
pub mod view;
