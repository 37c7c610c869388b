//! Subcommand implementations.

/// `chat:channel:init` handler.
pub mod channel_init;

/// `config:set`, `config:get` and `config:destroy` handlers.
pub mod configure;

/// `chat:settings:push` handler.
pub mod settings_push;
