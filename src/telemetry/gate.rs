use serde_json::Value;
use tracing::debug;

use super::transport::AnalyticsTransport;
use crate::settings::TelemetrySetting;

/// Internal counters the gate keeps while swallowing failures. The public
/// operations never surface an error, so this is the only place a broken
/// transport becomes visible.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TelemetryDiagnostics {
    pub events_captured: u64,
    pub transport_failures: u64,
}

/// Mediates all analytics traffic for the panel.
///
/// The gate is an explicitly constructed context object: whoever needs to
/// emit telemetry holds a reference, and swapping the transport swaps the
/// whole analytics backend. Disabling telemetry via [`configure`]
/// immediately suppresses both outbound events and people-property
/// storage, and any transport-level failure is swallowed rather than
/// propagated.
///
/// [`configure`]: TelemetryGate::configure
pub struct TelemetryGate {
    transport: Box<dyn AnalyticsTransport>,
    enabled: bool,
    identity: Option<String>,
    diagnostics: TelemetryDiagnostics,
}

impl TelemetryGate {
    /// A gate starts disabled; nothing flows until [`configure`] enables it.
    ///
    /// [`configure`]: TelemetryGate::configure
    pub fn new(transport: Box<dyn AnalyticsTransport>) -> Self {
        Self {
            transport,
            enabled: false,
            identity: None,
            diagnostics: TelemetryDiagnostics::default(),
        }
    }

    /// Gate backed by an in-process [`MemoryTransport`](super::MemoryTransport).
    pub fn in_memory() -> Self {
        Self::new(Box::new(super::transport::MemoryTransport::new()))
    }

    /// Apply the host's telemetry setting, resetting any prior session
    /// unconditionally first.
    ///
    /// The gate only enables when the setting is `Enabled` and both a
    /// non-empty API key and distinct id arrive together; anything less
    /// lands on the disabled state without complaint. Re-applying the same
    /// configuration is harmless.
    pub fn configure(
        &mut self,
        setting: TelemetrySetting,
        api_key: Option<&str>,
        distinct_id: Option<&str>,
    ) {
        self.transport.reset();
        self.enabled = false;
        self.identity = None;

        if setting != TelemetrySetting::Enabled {
            debug!("telemetry disabled");
            return;
        }

        let api_key = api_key.filter(|key| !key.is_empty());
        let distinct_id = distinct_id.filter(|id| !id.is_empty());
        let (Some(api_key), Some(distinct_id)) = (api_key, distinct_id) else {
            debug!("telemetry setting is enabled but credentials are incomplete; staying disabled");
            return;
        };

        match self.transport.init(api_key, distinct_id) {
            Ok(()) => {
                self.enabled = true;
                self.identity = Some(distinct_id.to_string());
                debug!(distinct_id, "telemetry enabled");
            }
            Err(_) => {
                self.diagnostics.transport_failures += 1;
            }
        }
    }

    /// Send one event. A disabled gate drops it; a failing transport loses
    /// it. Either way the caller never finds out.
    pub fn capture(&mut self, event: &str, properties: Option<&Value>) {
        if !self.enabled {
            return;
        }
        match self.transport.capture(event, properties) {
            Ok(()) => self.diagnostics.events_captured += 1,
            Err(_) => self.diagnostics.transport_failures += 1,
        }
    }

    /// Persist one people-property on the bound identity, if enabled.
    pub fn set_property(&mut self, name: &str, value: Value) {
        if !self.enabled {
            return;
        }
        if self.transport.set_person_property(name, value).is_err() {
            self.diagnostics.transport_failures += 1;
        }
    }

    /// Read a people-property. `None` when disabled, when the property was
    /// never set, or when the transport fails.
    pub fn get_property(&mut self, name: &str) -> Option<Value> {
        if !self.enabled {
            return None;
        }
        match self.transport.person_property(name) {
            Ok(value) => value,
            Err(_) => {
                self.diagnostics.transport_failures += 1;
                None
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The distinct id bound by the last enabling [`configure`], if any.
    ///
    /// [`configure`]: TelemetryGate::configure
    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn diagnostics(&self) -> TelemetryDiagnostics {
        self.diagnostics
    }
}
