//! Administrative command surface.
//!
//! Command tokens are matched case-insensitively against the whole input
//! string. Trailing arguments are not parsed: `!acip-unblock u42` does not
//! match `!acip-unblock` and falls through to the unrecognized reply, which is
//! the historical v1.1 behavior hosts depend on.

use serde::Serialize;

/// Fixed reply for privileged commands issued by a non-admin caller.
pub const ADMIN_ONLY_REPLY: &str = "⛔️ Commande réservée aux administrateurs";

/// Fixed reply for tokens that match no command.
pub const UNRECOGNIZED_REPLY: &str =
    "❓ Commande non reconnue. Utilisez !acip-help pour voir les commandes disponibles";

/// Recognized `!acip-*` command tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Status,
    Stats,
    Help,
    Enable,
    Disable,
    Reload,
    Report,
    Unblock,
}

impl Command {
    /// Parse a raw command string. Case-insensitive, whole token only.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "!acip-status" => Some(Command::Status),
            "!acip-stats" => Some(Command::Stats),
            "!acip-help" => Some(Command::Help),
            "!acip-enable" => Some(Command::Enable),
            "!acip-disable" => Some(Command::Disable),
            "!acip-reload" => Some(Command::Reload),
            "!acip-report" => Some(Command::Report),
            "!acip-unblock" => Some(Command::Unblock),
            _ => None,
        }
    }

    /// Whether this command requires an admin role.
    pub fn is_privileged(&self) -> bool {
        !matches!(self, Command::Status | Command::Help)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Status => "!acip-status",
            Command::Stats => "!acip-stats",
            Command::Help => "!acip-help",
            Command::Enable => "!acip-enable",
            Command::Disable => "!acip-disable",
            Command::Reload => "!acip-reload",
            Command::Report => "!acip-report",
            Command::Unblock => "!acip-unblock",
        }
    }
}

/// Identity of the caller issuing a command. Only the role is consulted.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub role: Option<String>,
}

impl Caller {
    pub fn with_role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
        }
    }
}

/// Discriminator for reply payloads. Only `message` is produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Message,
}

/// Reply returned for every command invocation, recognized or not.
#[derive(Debug, Clone, Serialize)]
pub struct CommandReply {
    #[serde(rename = "type")]
    pub kind: ReplyKind,
    pub content: String,
}

impl CommandReply {
    pub fn message(content: impl Into<String>) -> Self {
        Self {
            kind: ReplyKind::Message,
            content: content.into(),
        }
    }
}
