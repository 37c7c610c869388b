//! # stream - Chat Service CLI
//!
//! `stream` is a command-line client for a hosted chat service. Each
//! subcommand validates its flags, builds a JSON payload, makes one
//! authenticated API call and reports the result.
//!
//! ## Quick Start
//!
//! ```bash
//! # Store credentials
//! stream config:set --key <api-key> --secret <api-secret>
//!
//! # Create a channel
//! stream chat:channel:init --type messaging --name General --members alice,bob
//!
//! # Point push notifications at a webhook
//! stream chat:settings:push --enable --type webhook --webhook_url https://example.com/push
//! ```
//!
//! ## Configuration
//!
//! Credentials are stored in `~/.config/stream-cli/config.json`:
//!
//! ```json
//! {
//!   "name": "Ada",
//!   "email": "ada@example.com",
//!   "apiKey": "abc123",
//!   "apiSecret": "..."
//! }
//! ```
//!
//! `STREAM_API_KEY`, `STREAM_API_SECRET`, `STREAM_BASE_URL` and
//! `STREAM_TIMEOUT_SECS` override the file.

/// Command-line interface definitions and handlers.
pub mod cli;

/// REST client for the chat service.
pub mod client;

/// Configuration file management and credential resolution.
pub mod config;

/// Error type shared by every command.
pub mod error;

/// File system utilities.
pub mod fs;

/// Identifier generation for generated defaults.
pub mod ids;

/// Tracing subscriber setup.
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// JSON payload construction and merging.
pub mod payload;

/// Terminal UI components (spinner, colors).
pub mod ui;
