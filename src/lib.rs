//! Sidepane is the state layer behind a code-editor extension's side panel.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`telemetry`] gates every outbound analytics call behind the host's
//!   telemetry setting and swallows transport failures so analytics can
//!   never break the panel.
//! - [`host`] models the one-way command channel back to the extension
//!   host process, with typed commands serialized to the host's
//!   postMessage vocabulary.
//! - [`settings`] mirrors the key-value settings snapshot the host pushes
//!   and wires it into the telemetry gate.
//! - [`panel`] carries view-models for the interactive surfaces: MCP
//!   server rows, the mode-selector dropdown, and marketplace deep links.
//!
//! Nothing here renders. Consumers feed host state pushes in, read the
//! resulting state out, and hand a [`host::HostBridge`] plus a
//! [`telemetry::TelemetryGate`] to whichever surface needs them.

pub mod host;
pub mod panel;
pub mod settings;
pub mod telemetry;
