//! Hermes is a round-robin request broker.
//!
//! Backends register themselves over a plaintext TCP control protocol
//! (`+:address:port:id:/mount`) and withdraw the same way (`-:...`).
//! Client HTTP requests for files are handed to the next registered
//! backend in turn, and the backend's status, content type, cookies, and
//! body are relayed back to the client.
//!
//! # Architecture
//!
//! - [`directory`] -- The shared backend list and round-robin cursor.
//! - [`control`] -- Control frame codec, the registration listener, and the
//!   backend-side client.
//! - [`broker`] -- The request path: dispatch, outbound forwarding, and
//!   response relaying.
//! - [`server`] -- Axum server setup, shared application state, HTTP client,
//!   and graceful shutdown.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, register, deregister,
//!   validate, health).
//! - [`config`] -- Configuration model, validation, and file sources.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod broker;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod control;
pub mod directory;
pub mod error;
pub mod health;
pub mod logging;
pub mod server;
