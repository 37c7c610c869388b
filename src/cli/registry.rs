//! The command table.
//!
//! Each subcommand is described once as a [`CommandSpec`]: its name, help
//! text, flag schema and the handler it dispatches to. The clap parser is
//! built from this table, so the table is the single source of truth for
//! what each command accepts.

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command};

use crate::error::{Error, Result};

/// Channel types accepted by `chat:channel:init`.
pub const CHANNEL_TYPES: &[&str] = &["livestream", "messaging", "gaming", "commerce", "team"];

/// Push providers accepted by `chat:settings:push`.
pub const PUSH_TYPES: &[&str] = &["apn", "firebase", "webhook"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    String,
    Boolean,
}

/// Where a flag's value comes from when it is not supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDefault {
    Literal(&'static str),
    /// A fresh identifier drawn for each invocation.
    GeneratedId,
}

#[derive(Debug, Clone, Copy)]
pub struct FlagSpec {
    pub name: &'static str,
    pub short: char,
    pub description: &'static str,
    pub kind: FlagKind,
    pub choices: &'static [&'static str],
    pub required: bool,
    pub default: Option<FlagDefault>,
    pub conflicts_with: &'static [&'static str],
}

impl FlagSpec {
    pub const fn string(name: &'static str, short: char, description: &'static str) -> Self {
        Self {
            name,
            short,
            description,
            kind: FlagKind::String,
            choices: &[],
            required: false,
            default: None,
            conflicts_with: &[],
        }
    }

    pub const fn boolean(name: &'static str, short: char, description: &'static str) -> Self {
        Self {
            kind: FlagKind::Boolean,
            ..Self::string(name, short, description)
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    pub const fn default(mut self, default: FlagDefault) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn conflicts_with(mut self, names: &'static [&'static str]) -> Self {
        self.conflicts_with = names;
        self
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name)
            .long(self.name)
            .short(self.short)
            .help(self.description);

        match self.kind {
            FlagKind::Boolean => arg = arg.action(ArgAction::SetTrue),
            FlagKind::String => {
                arg = arg.action(ArgAction::Set);
                if !self.choices.is_empty() {
                    arg = arg.value_parser(PossibleValuesParser::new(self.choices.iter().copied()));
                }
            }
        }

        // A flag with a default is always satisfied, so clap only enforces
        // `required` on flags without one.
        match self.default {
            Some(FlagDefault::Literal(value)) => arg = arg.default_value(value),
            Some(FlagDefault::GeneratedId) => {
                arg = arg.help(format!("{} [default: random UUID]", self.description));
            }
            None => arg = arg.required(self.required),
        }

        for other in self.conflicts_with {
            arg = arg.conflicts_with(*other);
        }

        arg
    }
}

/// The handler a command dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    ChannelInit,
    SettingsPush,
    ConfigSet,
    ConfigGet,
    ConfigDestroy,
}

#[derive(Debug)]
pub struct CommandSpec {
    pub name: &'static str,
    pub about: &'static str,
    pub flags: &'static [FlagSpec],
    pub kind: CommandKind,
}

impl CommandSpec {
    pub fn flag(&self, name: &str) -> Option<&FlagSpec> {
        self.flags.iter().find(|f| f.name == name)
    }

    fn to_command(&self) -> Command {
        self.flags
            .iter()
            .fold(Command::new(self.name).about(self.about), |cmd, flag| {
                cmd.arg(flag.to_arg())
            })
    }
}

const CHANNEL_INIT_FLAGS: &[FlagSpec] = &[
    FlagSpec::string("id", 'i', "A unique ID for the channel you wish to create.")
        .required()
        .default(FlagDefault::GeneratedId),
    FlagSpec::string("type", 't', "Type of channel.")
        .required()
        .choices(CHANNEL_TYPES),
    FlagSpec::string("name", 'n', "Name of the channel room.").required(),
    FlagSpec::string("image", 'u', "URL to channel image."),
    FlagSpec::string(
        "members",
        'm',
        "Comma separated list of members to add to the channel.",
    ),
    FlagSpec::string("data", 'd', "Additional data as a JSON object."),
];

const SETTINGS_PUSH_FLAGS: &[FlagSpec] = &[
    FlagSpec::boolean("enable", 'e', "Enable push notifications for your project.")
        .conflicts_with(&["disable"]),
    FlagSpec::boolean("disable", 'd', "Disable push notifications for your project."),
    FlagSpec::string("type", 't', "Type of configuration.").choices(PUSH_TYPES),
    FlagSpec::string("auth_key", 'a', "Private auth key for APN."),
    FlagSpec::string("key_id", 'k', "Key ID for APN."),
    FlagSpec::string("team_id", 'i', "Team ID for APN."),
    FlagSpec::string("pem_cert", 'p', "Private RSA key for APN (.pem)."),
    FlagSpec::string("p12_cert", 'b', "Path to the .p12 file for APN."),
    FlagSpec::string(
        "notification_template",
        'n',
        "JSON template for notifications (APN and Firebase).",
    ),
    FlagSpec::string("api_key", 'f', "API key for Firebase."),
    FlagSpec::string("webhook_url", 'w', "Fully qualified URL for webhook support."),
    FlagSpec::boolean(
        "json",
        'j',
        "Output results in JSON. When not specified, returns output in a human friendly format.",
    ),
];

const CONFIG_SET_FLAGS: &[FlagSpec] = &[
    FlagSpec::string("name", 'n', "Your full name."),
    FlagSpec::string("email", 'e', "Your email address."),
    FlagSpec::string("key", 'k', "Application API key."),
    FlagSpec::string("secret", 's', "Application API secret."),
    FlagSpec::string("url", 'u', "API base URL (defaults to the hosted service)."),
];

const CONFIG_GET_FLAGS: &[FlagSpec] = &[FlagSpec::boolean(
    "json",
    'j',
    "Output the configuration as JSON.",
)];

pub static COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "chat:channel:init",
        about: "Create a new channel.",
        flags: CHANNEL_INIT_FLAGS,
        kind: CommandKind::ChannelInit,
    },
    CommandSpec {
        name: "chat:settings:push",
        about: "Enable or disable push notifications.",
        flags: SETTINGS_PUSH_FLAGS,
        kind: CommandKind::SettingsPush,
    },
    CommandSpec {
        name: "config:set",
        about: "Store API credentials in the config file.",
        flags: CONFIG_SET_FLAGS,
        kind: CommandKind::ConfigSet,
    },
    CommandSpec {
        name: "config:get",
        about: "Show the stored configuration.",
        flags: CONFIG_GET_FLAGS,
        kind: CommandKind::ConfigGet,
    },
    CommandSpec {
        name: "config:destroy",
        about: "Remove the stored configuration.",
        flags: &[],
        kind: CommandKind::ConfigDestroy,
    },
];

/// Looks up a command by name.
pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Flags accepted before or after any subcommand.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalOptions {
    pub verbosity: u8,
    pub quiet: bool,
    pub no_color: bool,
}

/// A parsed command line: which command, its raw matches and global options.
#[derive(Debug)]
pub struct Invocation {
    pub command: &'static CommandSpec,
    pub matches: ArgMatches,
    pub globals: GlobalOptions,
}

pub fn build_cli() -> Command {
    let root = Command::new("stream")
        .about("Command-line client for the hosted chat service")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Log requests to stderr (-v debug, -vv trace)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Suppress status output"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Disable colored output"),
        );

    COMMANDS
        .iter()
        .fold(root, |cli, spec| cli.subcommand(spec.to_command()))
}

/// Parses argv (including the binary name) against the command table.
///
/// Missing required flags and values outside a flag's choices are rejected
/// here, before any handler runs.
pub fn parse_from<I, T>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let matches = build_cli().try_get_matches_from(args)?;

    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| Error::validation("No command given"))?;
    let command =
        find(name).ok_or_else(|| Error::validation(format!("Unknown command '{name}'")))?;

    let globals = GlobalOptions {
        verbosity: sub_matches.get_count("verbose"),
        quiet: sub_matches.get_flag("quiet"),
        no_color: sub_matches.get_flag("no-color"),
    };

    Ok(Invocation {
        command,
        matches: sub_matches.clone(),
        globals,
    })
}
