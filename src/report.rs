//! Status, statistics, help and report rendering.
//!
//! Presentation only: pure functions over the settings and statistics records.
//! The templates (French text and emoji markers included) are stable strings
//! that hosts match on; change them only with a catalog/version bump.

use chrono::{SecondsFormat, Utc};

use crate::{PluginSettings, PluginStats};

/// Short status summary shown for `!acip-status`.
pub fn status_message(settings: &PluginSettings) -> String {
    format!(
        "🛡️ **ACIP Security Status**\n\n\
         **Protection:** {}\n\
         **Version:** {}\n\
         **Langue:** {}\n\
         **Mode de détection:** {}\n\n\
         Bonne journée ! 🌟",
        enabled_label(settings.enabled),
        settings.acip_version,
        settings.language.to_uppercase(),
        settings.detection_mode,
    )
}

/// Counter summary shown for `!acip-stats`.
pub fn stats_message(stats: &PluginStats) -> String {
    format!(
        "📊 **ACIP Security Statistics**\n\n\
         **Attaques détectées:** {}\n\
         **Attaques bloquées:** {}\n\
         **Faux positifs:** {}\n\
         **Requêtes traitées:** {}\n\n\
         Taux de succès de blocage: {}\n\n\
         Statistiques mises à jour ! 🎯",
        stats.attacks_detected,
        stats.attacks_blocked,
        stats.false_positives,
        stats.requests_processed,
        block_rate(stats),
    )
}

/// Static command catalog shown for `!acip-help`.
pub fn help_message() -> &'static str {
    "🛡️ **ACIP Security - Commandes**\n\n\
     **Commandes Publiques:**\n\
     • `!acip-status` - État de la protection\n\
     • `!acip-stats` - Statistiques d'attaques\n\
     • `!acip-help` - Aide complète\n\n\
     **Commandes Admin:**\n\
     • `!acip-enable` - Activer la protection\n\
     • `!acip-disable` - Désactiver la protection\n\
     • `!acip-reload` - Recharger le prompt\n\
     • `!acip-report` - Rapport détaillé\n\
     • `!acip-unblock <id>` - Débloquer un utilisateur\n\n\
     Besoin d'aide supplémentaire? 📞"
}

/// Detailed report shown for `!acip-report`, stamped with the current UTC time.
pub fn report_message(settings: &PluginSettings) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    format!(
        "📋 **ACIP Security - Detailed Report**\n\n\
         **Protection:** {}\n\
         **Version:** {}\n\
         **Mode:** {}\n\n\
         **Dernière mise à jour:** {}\n\n\
         Pour plus d'informations: https://optimizclaw.ai",
        enabled_label(settings.enabled),
        settings.acip_version,
        settings.detection_mode,
        timestamp,
    )
}

/// Share of processed requests that were blocked, rendered as a percentage.
/// Returns "0%" when nothing has been processed yet.
pub fn block_rate(stats: &PluginStats) -> String {
    if stats.requests_processed == 0 {
        return "0%".to_string();
    }
    let rate = (stats.attacks_blocked as f64 / stats.requests_processed as f64) * 100.0;
    format!("{}%", rate.round() as u64)
}

fn enabled_label(enabled: bool) -> &'static str {
    if enabled {
        "✅ Activée"
    } else {
        "❌ Désactivée"
    }
}
