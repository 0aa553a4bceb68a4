use serde_json::Value;
use std::collections::HashMap;

/// Seam between [`TelemetryGate`](super::TelemetryGate) and whichever
/// analytics SDK actually ships events.
///
/// Implementations report failures as plain strings; the gate counts and
/// swallows them, so a transport is free to fail loudly here without ever
/// disturbing the panel.
pub trait AnalyticsTransport {
    /// Drop any bound identity and buffered SDK state.
    fn reset(&mut self);

    /// Bring the transport up for the given project key and identify the
    /// session as `distinct_id`.
    fn init(&mut self, api_key: &str, distinct_id: &str) -> Result<(), String>;

    /// Send one event, optionally with a property map.
    fn capture(&mut self, event: &str, properties: Option<&Value>) -> Result<(), String>;

    /// Persist a named people-property on the bound identity.
    fn set_person_property(&mut self, name: &str, value: Value) -> Result<(), String>;

    /// Read back a previously stored people-property, `None` if never set.
    fn person_property(&mut self, name: &str) -> Result<Option<Value>, String>;
}

/// An event a [`MemoryTransport`] recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub name: String,
    pub properties: Option<Value>,
}

/// In-process transport: events and people-properties live in maps and die
/// with the process.
///
/// This is the offline/default sink and the workhorse for tests; a real
/// PostHog-backed transport lives outside this crate and is injected by
/// the embedding application.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    identity: Option<String>,
    events: Vec<CapturedEvent>,
    people: HashMap<String, Value>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> Option<&str> {
        self.identity.as_deref()
    }

    pub fn events(&self) -> &[CapturedEvent] {
        &self.events
    }
}

impl AnalyticsTransport for MemoryTransport {
    fn reset(&mut self) {
        self.identity = None;
        self.events.clear();
        self.people.clear();
    }

    fn init(&mut self, api_key: &str, distinct_id: &str) -> Result<(), String> {
        if api_key.is_empty() {
            return Err("analytics API key is empty".to_string());
        }
        self.identity = Some(distinct_id.to_string());
        Ok(())
    }

    fn capture(&mut self, event: &str, properties: Option<&Value>) -> Result<(), String> {
        self.require_identity()?;
        self.events.push(CapturedEvent {
            name: event.to_string(),
            properties: properties.cloned(),
        });
        Ok(())
    }

    fn set_person_property(&mut self, name: &str, value: Value) -> Result<(), String> {
        self.require_identity()?;
        self.people.insert(name.to_string(), value);
        Ok(())
    }

    fn person_property(&mut self, name: &str) -> Result<Option<Value>, String> {
        self.require_identity()?;
        Ok(self.people.get(name).cloned())
    }
}

impl MemoryTransport {
    fn require_identity(&self) -> Result<(), String> {
        if self.identity.is_none() {
            return Err("transport has no bound identity".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn init_binds_identity() {
        let mut transport = MemoryTransport::new();
        transport.init("key123", "user42").unwrap();
        assert_eq!(transport.identity(), Some("user42"));
    }

    #[test]
    fn init_rejects_empty_key() {
        let mut transport = MemoryTransport::new();
        assert!(transport.init("", "user42").is_err());
        assert_eq!(transport.identity(), None);
    }

    #[test]
    fn operations_fail_without_identity() {
        let mut transport = MemoryTransport::new();
        assert!(transport.capture("event", None).is_err());
        assert!(transport
            .set_person_property("flag", json!(true))
            .is_err());
        assert!(transport.person_property("flag").is_err());
    }

    #[test]
    fn reset_discards_everything() {
        let mut transport = MemoryTransport::new();
        transport.init("key123", "user42").unwrap();
        transport.capture("event", None).unwrap();
        transport
            .set_person_property("flag", json!(true))
            .unwrap();

        transport.reset();

        assert_eq!(transport.identity(), None);
        assert!(transport.events().is_empty());
        assert!(transport.person_property("flag").is_err());
    }
}
