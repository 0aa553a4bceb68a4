use serde::Deserialize;
use serde_json::Value;

use crate::host::{HostBridge, HostCommand, PanelTab};
use crate::telemetry::TelemetryGate;

/// People-property recording that the user has found the mode selector at
/// least once. Drives the first-open highlight.
pub const OPENED_MODE_SELECTOR_PROPERTY: &str = "openedModeSelector";

/// A persona the assistant can operate as. Custom modes arrive from the
/// host alongside the built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Mode {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Mode {
    fn builtin(slug: &str, name: &str, description: &str) -> Self {
        Self {
            slug: slug.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
        }
    }
}

pub fn builtin_modes() -> Vec<Mode> {
    vec![
        Mode::builtin("code", "Code", "Write, refactor, and fix code"),
        Mode::builtin("architect", "Architect", "Plan before building"),
        Mode::builtin("ask", "Ask", "Answer questions without changing anything"),
        Mode::builtin("debug", "Debug", "Diagnose and fix problems"),
        Mode::builtin("orchestrator", "Orchestrator", "Split work across modes"),
    ]
}

/// Built-ins overlaid with custom modes: a custom mode replaces the
/// built-in sharing its slug, otherwise it is appended.
pub fn all_modes(custom: &[Mode]) -> Vec<Mode> {
    let mut modes = builtin_modes();
    for mode in custom {
        match modes.iter_mut().find(|m| m.slug == mode.slug) {
            Some(existing) => *existing = mode.clone(),
            None => modes.push(mode.clone()),
        }
    }
    modes
}

/// First-open tracking for the mode selector.
///
/// New users get a highlight on the selector trigger until they open it
/// once; the fact is remembered as a people-property so it sticks across
/// sessions. With telemetry disabled there is nothing to read or write,
/// and the user is assumed to have opened it already so the highlight
/// never nags.
#[derive(Debug)]
pub struct ModeSelectorTracking {
    has_opened: bool,
}

impl Default for ModeSelectorTracking {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeSelectorTracking {
    /// Starts in the "already opened" state so the highlight never
    /// flashes before the gate has been consulted.
    pub fn new() -> Self {
        Self { has_opened: true }
    }

    pub fn has_opened(&self) -> bool {
        self.has_opened
    }

    /// Re-derive the flag from the gate, typically after a settings push.
    pub fn refresh(&mut self, gate: &mut TelemetryGate) {
        if !gate.is_enabled() {
            self.has_opened = true;
            return;
        }
        let stored = gate.get_property(OPENED_MODE_SELECTOR_PROPERTY);
        self.has_opened = stored == Some(Value::Bool(true));
    }

    /// Record the first open. The people-property is written once; later
    /// opens are no-ops.
    pub fn track_opened(&mut self, gate: &mut TelemetryGate) {
        if self.has_opened || !gate.is_enabled() {
            return;
        }
        gate.set_property(OPENED_MODE_SELECTOR_PROPERTY, Value::Bool(true));
        self.has_opened = true;
    }
}

/// The mode-selector dropdown: the mode list, the current selection, and
/// the open/close state with first-open tracking wired in.
#[derive(Debug)]
pub struct ModeSelector {
    modes: Vec<Mode>,
    value: String,
    open: bool,
    tracking: ModeSelectorTracking,
}

impl ModeSelector {
    pub fn new(modes: Vec<Mode>, value: impl Into<String>) -> Self {
        Self {
            modes,
            value: value.into(),
            open: false,
            tracking: ModeSelectorTracking::new(),
        }
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.slug == self.value)
    }

    /// Whether the trigger should carry the first-open highlight.
    pub fn shows_highlight(&self) -> bool {
        !self.tracking.has_opened()
    }

    /// Sync the highlight state with the current telemetry configuration.
    pub fn refresh_tracking(&mut self, gate: &mut TelemetryGate) {
        self.tracking.refresh(gate);
    }

    /// Open or close the dropdown. Opening records the first open.
    pub fn set_open(&mut self, open: bool, gate: &mut TelemetryGate) {
        if open {
            self.tracking.track_opened(gate);
        }
        self.open = open;
    }

    /// Pick a mode by slug. Unknown slugs leave the selection untouched;
    /// a successful pick closes the dropdown.
    pub fn select(&mut self, slug: &str) -> Option<&Mode> {
        if !self.modes.iter().any(|mode| mode.slug == slug) {
            return None;
        }
        self.value = slug.to_string();
        self.open = false;
        self.selected()
    }

    /// Header icon: jump to the mode marketplace tab, closing the
    /// dropdown.
    pub fn open_marketplace(&mut self, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::SwitchTab {
            tab: PanelTab::Marketplace,
        });
        self.open = false;
    }

    /// Header icon: jump to the mode settings tab, closing the dropdown.
    pub fn open_mode_settings(&mut self, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::SwitchTab {
            tab: PanelTab::Modes,
        });
        self.open = false;
    }
}
