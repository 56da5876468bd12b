//! ACIP Security plugin for chat platforms.
//!
//! Screens inbound messages for prompt-injection attempts:
//! - Weighted regex catalog and 0..=10 risk scoring
//! - Auto-blocking at a configurable threshold
//! - Whitelist and kill-switch short-circuits
//! - `!acip-*` administrative commands with role-gated dispatch
//!
//! Message transport, user/role resolution, persistence and the log subscriber
//! are owned by the host; the plugin reaches them through narrow interfaces
//! ([`store::SettingsStore`], `tracing`) and never lets their failures escape
//! an `analyze` or command call.

pub mod commands;
pub mod detection;
pub mod report;
pub mod store;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use commands::{Caller, Command, CommandReply, ADMIN_ONLY_REPLY, UNRECOGNIZED_REPLY};
use detection::RiskScorer;
use store::{NoopStore, SettingsStore};

/// Construction-time overrides, deserialized from host configuration.
///
/// Field names use camelCase to match the host plugin manifest style. Any
/// subset may be supplied; unspecified options take the documented defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
    pub enabled: Option<bool>,
    pub acip_version: Option<String>,
    pub language: Option<String>,
    pub auto_block_threshold: Option<u8>,
    pub enable_logging: Option<bool>,
}

/// Advisory feature toggles. Only the top-level `enabled` flag gates behavior
/// today; these are carried for hosts and dashboards that read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    pub attack_detection: bool,
    pub auto_blocking: bool,
    pub security_alerts: bool,
    pub statistics_tracking: bool,
    pub dashboard: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            attack_detection: true,
            auto_blocking: true,
            security_alerts: true,
            statistics_tracking: true,
            dashboard: true,
        }
    }
}

/// Full runtime settings record. Created at construction, mutated only by the
/// `!acip-enable` / `!acip-disable` commands, lives for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginSettings {
    pub enabled: bool,
    pub acip_version: String,
    pub language: String,
    /// Inclusive lower bound: scores at or above this value are blocked.
    pub auto_block_threshold: u8,
    /// Informational; no timed unblocking is performed.
    pub block_duration_minutes: u32,
    /// Channel for security alerts. Unused by plugin logic.
    pub security_channel_id: Option<String>,
    pub enable_logging: bool,
    pub detection_mode: String,
    /// Roles allowed to run privileged commands.
    pub admin_roles: HashSet<String>,
    /// User identifiers exempt from analysis.
    pub whitelisted_users: HashSet<String>,
    pub features: FeatureFlags,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            acip_version: "v1.1".to_string(),
            language: "fr".to_string(),
            auto_block_threshold: 3,
            block_duration_minutes: 60,
            security_channel_id: None,
            enable_logging: true,
            detection_mode: "standard".to_string(),
            admin_roles: ["Admin", "Moderator", "Security"]
                .into_iter()
                .map(String::from)
                .collect(),
            whitelisted_users: HashSet::new(),
            features: FeatureFlags::default(),
        }
    }
}

impl From<PluginOptions> for PluginSettings {
    fn from(options: PluginOptions) -> Self {
        let mut settings = PluginSettings::default();
        if let Some(enabled) = options.enabled {
            settings.enabled = enabled;
        }
        if let Some(version) = options.acip_version {
            settings.acip_version = version;
        }
        if let Some(language) = options.language {
            settings.language = language;
        }
        if let Some(threshold) = options.auto_block_threshold {
            settings.auto_block_threshold = threshold;
        }
        if let Some(enable_logging) = options.enable_logging {
            settings.enable_logging = enable_logging;
        }
        settings
    }
}

/// Screening counters. Monotonically non-decreasing; `false_positives` is
/// reserved for manual correction and never incremented by plugin logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginStats {
    pub attacks_detected: u64,
    pub attacks_blocked: u64,
    pub false_positives: u64,
    pub requests_processed: u64,
}

/// Sender identity attached to an inbound message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Inbound message as received from the host, tolerant of the field shapes
/// different platforms produce (`content`/`text`, `user`/`author`/`sender`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncomingMessage {
    #[serde(default, alias = "text")]
    pub content: Option<String>,
    #[serde(default, alias = "author", alias = "sender")]
    pub user: Option<MessageUser>,
}

impl IncomingMessage {
    /// Convenience constructor for hosts that already resolved the fields.
    pub fn new(content: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            user: Some(MessageUser {
                id: Some(user_id.into()),
                username: None,
            }),
        }
    }
}

/// Canonical message record all plugin logic runs against. Missing content
/// becomes the empty string; the user key prefers `id`, then `username`.
#[derive(Debug, Clone)]
struct CanonicalMessage {
    text: String,
    user_key: Option<String>,
}

impl CanonicalMessage {
    fn from_incoming(message: &IncomingMessage) -> Self {
        let text = message.content.clone().unwrap_or_default();
        let user_key = message
            .user
            .as_ref()
            .and_then(|u| u.id.clone().or_else(|| u.username.clone()));
        Self { text, user_key }
    }
}

/// Why a message was let through without scoring, or blocked after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisReason {
    Whitelisted,
    Disabled,
    ThresholdExceeded,
}

impl AnalysisReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisReason::Whitelisted => "User whitelisted",
            AnalysisReason::Disabled => "Plugin disabled",
            AnalysisReason::ThresholdExceeded => "Risk score threshold exceeded",
        }
    }
}

impl Serialize for AnalysisReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of screening one message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub safe: bool,
    pub blocked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<AnalysisReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u8>,
}

impl AnalysisResult {
    fn skipped(reason: AnalysisReason) -> Self {
        Self {
            safe: true,
            blocked: false,
            reason: Some(reason),
            risk_score: None,
        }
    }

    fn allowed(risk_score: u8) -> Self {
        Self {
            safe: true,
            blocked: false,
            reason: None,
            risk_score: Some(risk_score),
        }
    }

    fn blocked(risk_score: u8) -> Self {
        Self {
            safe: false,
            blocked: true,
            reason: Some(AnalysisReason::ThresholdExceeded),
            risk_score: Some(risk_score),
        }
    }
}

/// ACIP Security plugin instance.
///
/// Construct once, pass to each call. Settings and statistics live behind
/// async locks so a multi-tasked host may invoke `analyze` and
/// `execute_command` concurrently.
pub struct AcipSecurityPlugin {
    settings: RwLock<PluginSettings>,
    stats: Mutex<PluginStats>,
    scorer: RiskScorer,
    store: Box<dyn SettingsStore>,
}

impl AcipSecurityPlugin {
    /// Create a plugin from host overrides merged over the defaults.
    pub fn new(options: PluginOptions) -> Self {
        Self::with_settings(options.into())
    }

    /// Create a plugin from a fully specified settings record.
    pub fn with_settings(settings: PluginSettings) -> Self {
        Self {
            settings: RwLock::new(settings),
            stats: Mutex::new(PluginStats::default()),
            scorer: RiskScorer::new(),
            store: Box::new(NoopStore),
        }
    }

    /// Install a settings persistence hook.
    pub fn with_store(mut self, store: Box<dyn SettingsStore>) -> Self {
        self.store = store;
        self
    }

    /// Readiness hook. Logging only; the constructor alone establishes a
    /// valid, usable state and hosts may skip this call entirely.
    pub async fn initialize(&self) {
        let settings = self.settings.read().await;
        if settings.enable_logging {
            info!(
                version = %settings.acip_version,
                language = %settings.language,
                threshold = settings.auto_block_threshold,
                "ACIP Security plugin initialized"
            );
        }
    }

    /// Screen one inbound message.
    ///
    /// Every call counts toward `requests_processed`, including whitelisted
    /// and disabled paths: traffic volume is tracked regardless of whether
    /// the message was actually analyzed.
    pub async fn analyze(&self, message: &IncomingMessage) -> AnalysisResult {
        {
            let mut stats = self.stats.lock().await;
            stats.requests_processed += 1;
        }

        let canonical = CanonicalMessage::from_incoming(message);
        let settings = self.settings.read().await;

        if let Some(user_key) = &canonical.user_key {
            if settings.whitelisted_users.contains(user_key) {
                return AnalysisResult::skipped(AnalysisReason::Whitelisted);
            }
        }

        if !settings.enabled {
            return AnalysisResult::skipped(AnalysisReason::Disabled);
        }

        let risk_score = self.scorer.score(&canonical.text);

        if risk_score >= settings.auto_block_threshold {
            {
                let mut stats = self.stats.lock().await;
                stats.attacks_detected += 1;
                stats.attacks_blocked += 1;
            }
            if settings.enable_logging {
                warn!(
                    risk_score,
                    threshold = settings.auto_block_threshold,
                    "message blocked"
                );
            }
            return AnalysisResult::blocked(risk_score);
        }

        AnalysisResult::allowed(risk_score)
    }

    /// Execute an administrative command on behalf of `caller`.
    ///
    /// Always returns exactly one reply; unrecognized tokens and failed
    /// authorization are normal replies, never errors.
    pub async fn execute_command(&self, raw: &str, caller: &Caller) -> CommandReply {
        let command = match Command::parse(raw) {
            Some(command) => command,
            None => return CommandReply::message(UNRECOGNIZED_REPLY),
        };

        // Single authorization gate ahead of dispatch.
        if command.is_privileged() && !self.is_admin(caller).await {
            return CommandReply::message(ADMIN_ONLY_REPLY);
        }

        match command {
            Command::Status => {
                let settings = self.settings.read().await;
                CommandReply::message(report::status_message(&settings))
            }
            Command::Stats => {
                let stats = self.stats.lock().await;
                CommandReply::message(report::stats_message(&stats))
            }
            Command::Help => CommandReply::message(report::help_message()),
            Command::Enable => {
                self.set_enabled(true).await;
                CommandReply::message("✅ Protection ACIP activée")
            }
            Command::Disable => {
                self.set_enabled(false).await;
                CommandReply::message("⚠️ Protection ACIP désactivée")
            }
            // Prompt reloading is owned by the host; confirmation only.
            Command::Reload => CommandReply::message("🔄 Prompts rechargés avec succès"),
            Command::Report => {
                let settings = self.settings.read().await;
                CommandReply::message(report::report_message(&settings))
            }
            // Placeholder: no block registry exists to update yet.
            Command::Unblock => CommandReply::message("🛡️ Blocage mis à jour"),
        }
    }

    /// Snapshot of the current settings record.
    pub async fn settings(&self) -> PluginSettings {
        self.settings.read().await.clone()
    }

    /// Snapshot of the current counters.
    pub async fn stats(&self) -> PluginStats {
        self.stats.lock().await.clone()
    }

    async fn is_admin(&self, caller: &Caller) -> bool {
        let settings = self.settings.read().await;
        caller
            .role
            .as_ref()
            .is_some_and(|role| settings.admin_roles.contains(role))
    }

    async fn set_enabled(&self, enabled: bool) {
        let snapshot = {
            let mut settings = self.settings.write().await;
            settings.enabled = enabled;
            settings.clone()
        };
        // Fire-and-forget persistence: a failing store must never abort the
        // command that triggered it.
        if let Err(e) = self.store.save(&snapshot).await {
            if snapshot.enable_logging {
                warn!(error = %e, "failed to persist settings");
            }
        } else if snapshot.enable_logging {
            info!(enabled, "settings updated");
        }
    }
}

impl Default for AcipSecurityPlugin {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}
