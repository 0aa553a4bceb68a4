use serde::Deserialize;

use crate::telemetry::TelemetryGate;

/// Host-supplied switch for analytics collection. Anything that is not
/// literally `"enabled"` deserializes to [`TelemetrySetting::Unset`] and is
/// treated as disabled downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TelemetrySetting {
    Enabled,
    Disabled,
    #[default]
    Unset,
}

impl From<String> for TelemetrySetting {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "enabled" => TelemetrySetting::Enabled,
            "disabled" => TelemetrySetting::Disabled,
            _ => TelemetrySetting::Unset,
        }
    }
}

/// The slice of the host's settings snapshot the panel cares about. The
/// host pushes the whole snapshot on every change; unknown keys are
/// ignored and missing keys fall back to defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelSettings {
    pub telemetry_setting: TelemetrySetting,
    pub telemetry_api_key: Option<String>,
    pub telemetry_distinct_id: Option<String>,
    pub mcp_enabled: bool,
    pub enable_mcp_server_creation: bool,
    pub always_allow_mcp: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            telemetry_setting: TelemetrySetting::Unset,
            telemetry_api_key: None,
            telemetry_distinct_id: None,
            mcp_enabled: true,
            enable_mcp_server_creation: false,
            always_allow_mcp: false,
        }
    }
}

impl PanelSettings {
    /// Reapply the snapshot's telemetry fields to the gate. The gate
    /// resets before applying, so calling this on every settings push
    /// gives reset-then-reinitialize semantics rather than incremental
    /// update.
    pub fn configure_telemetry(&self, gate: &mut TelemetryGate) {
        gate.configure(
            self.telemetry_setting,
            self.telemetry_api_key.as_deref(),
            self.telemetry_distinct_id.as_deref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_setting_string_is_unset() {
        let setting: TelemetrySetting = serde_json::from_value(json!("maybe")).unwrap();
        assert_eq!(setting, TelemetrySetting::Unset);

        let setting: TelemetrySetting = serde_json::from_value(json!("enabled")).unwrap();
        assert_eq!(setting, TelemetrySetting::Enabled);

        let setting: TelemetrySetting = serde_json::from_value(json!("disabled")).unwrap();
        assert_eq!(setting, TelemetrySetting::Disabled);
    }

    #[test]
    fn snapshot_defaults_apply_for_missing_keys() {
        let settings: PanelSettings = serde_json::from_value(json!({})).unwrap();
        assert_eq!(settings.telemetry_setting, TelemetrySetting::Unset);
        assert!(settings.mcp_enabled);
        assert!(!settings.enable_mcp_server_creation);
    }

    #[test]
    fn snapshot_configures_the_gate() {
        let settings: PanelSettings = serde_json::from_value(json!({
            "telemetrySetting": "enabled",
            "telemetryApiKey": "key123",
            "telemetryDistinctId": "user42",
        }))
        .unwrap();

        let mut gate = TelemetryGate::in_memory();
        settings.configure_telemetry(&mut gate);
        assert!(gate.is_enabled());
        assert_eq!(gate.identity(), Some("user42"));
    }

    #[test]
    fn snapshot_without_credentials_keeps_gate_disabled() {
        let settings: PanelSettings = serde_json::from_value(json!({
            "telemetrySetting": "enabled",
        }))
        .unwrap();

        let mut gate = TelemetryGate::in_memory();
        settings.configure_telemetry(&mut gate);
        assert!(!gate.is_enabled());
    }
}
