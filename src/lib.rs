//! An async Rust client for the APIFRAME generative-media API.
//!
//! Every APIFRAME operation is asynchronous on the provider side: a creation
//! call returns a task id, and the task is then polled through a shared fetch
//! endpoint until it finishes. This crate wraps that pattern in a single
//! [`Poller`] with configurable backoff, budgets, and status vocabulary.
//!
//! ## Features
//! - Image generation, image-to-video, standard and creative upscaling.
//! - Exponential backoff with independent base, multiplier, and cap.
//! - Soft retries for transient fetch failures; fatal submission errors.
//! - Typed errors that distinguish timeouts, exhausted retries, unexpected
//!   statuses, and missing results.
//! - An optional axum service exposing video generation over HTTP.

pub mod client;
pub mod config;
pub mod error;
pub mod operation;
pub mod output;
pub mod poller;
pub mod server;
pub mod types;

pub use client::ApiframeClient;
pub use config::Settings;
pub use error::{ApiframeError, ErrorKind};
pub use operation::Operation;
pub use poller::{
    Backoff, Completed, MissingField, PollConfig, Poller, StatusClass, TaskSubmission,
    TaskTransport,
};
pub use types::*;
