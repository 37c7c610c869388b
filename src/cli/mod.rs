//! Command-line interface: the command table, flag parsing and dispatch.

/// Subcommand implementations.
pub mod commands;

/// Typed access to parsed flags.
pub mod flags;

/// The static command table and argv parsing.
pub mod registry;

use serde_json::Value;
use tracing::debug;

use crate::client::{ChatService, StreamClient};
use crate::config::ConfigManager;
use crate::error::Result;
use crate::ids::{IdGenerator, UuidGenerator};
use crate::ui::Style;

use commands::settings_push::PushPlan;
use commands::{channel_init, configure, settings_push};
pub use flags::{FlagValue, ParsedFlags};
pub use registry::{CommandKind, CommandSpec, GlobalOptions, Invocation, build_cli, parse_from};

/// What a successful command has to say.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A confirmation, printed in the success color.
    Success(String),
    /// Plain text: hints and listings.
    Info(String),
    /// Machine-readable output for `--json`.
    Json(Value),
}

impl Outcome {
    /// Prints the outcome to stdout.
    pub fn render(&self) {
        match self {
            Self::Success(message) => println!("{}", Style::success(message)),
            Self::Info(text) => println!("{text}"),
            Self::Json(value) => println!(
                "{}",
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            ),
        }
    }
}

/// Builds an authenticated client handle on demand.
///
/// Commands ask for a client only after their local validation passed, so a
/// malformed flag never triggers authentication or a network call.
pub trait Connector: Send + Sync {
    fn connect(&self) -> Result<Box<dyn ChatService>>;
}

impl Connector for ConfigManager {
    fn connect(&self) -> Result<Box<dyn ChatService>> {
        let credentials = self.credentials()?;
        debug!(base_url = %credentials.base_url, "connecting");
        Ok(Box::new(StreamClient::new(&credentials)?))
    }
}

/// Collaborators a command runs against.
pub struct Runtime {
    pub config: ConfigManager,
    pub connector: Box<dyn Connector>,
    pub ids: Box<dyn IdGenerator>,
}

impl Runtime {
    /// The production runtime: config from the XDG config dir, the hosted
    /// API and random UUIDs.
    ///
    /// Nothing is resolved here; each command touches only what it needs.
    pub fn from_env() -> Self {
        let config = ConfigManager::new();
        Self {
            connector: Box::new(config.clone()),
            config,
            ids: Box::new(UuidGenerator),
        }
    }
}

/// Runs the parsed command to completion.
pub async fn execute(invocation: &Invocation, runtime: &Runtime) -> Result<Outcome> {
    let command = invocation.command;
    let flags = ParsedFlags::resolve(command, &invocation.matches, runtime.ids.as_ref());
    debug!(command = command.name, "dispatching");

    match command.kind {
        CommandKind::ChannelInit => {
            let request = channel_init::ChannelInit::from_flags(&flags, runtime.ids.as_ref())?;
            let service = runtime.connector.connect()?;
            channel_init::run(request, service.as_ref()).await
        }
        CommandKind::SettingsPush => match settings_push::plan(&flags)? {
            PushPlan::Skip(hint) => Ok(Outcome::Info(hint)),
            PushPlan::Update(update) => {
                let service = runtime.connector.connect()?;
                settings_push::run(update, service.as_ref(), flags.switch("json")).await
            }
        },
        CommandKind::ConfigSet => configure::run_set(&flags, &runtime.config),
        CommandKind::ConfigGet => configure::run_get(&flags, &runtime.config),
        CommandKind::ConfigDestroy => configure::run_destroy(&runtime.config),
    }
}
