use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::{HostBridge, HostCommand};
use crate::settings::PanelSettings;

/// Fallback when a server's config JSON carries no `timeout` key, or no
/// parseable JSON at all.
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 60;

/// Timeout choices offered by the row's dropdown, 15 seconds to an hour.
pub const NETWORK_TIMEOUT_OPTIONS_SECS: [u64; 8] = [15, 30, 60, 300, 600, 900, 1800, 3600];

/// Connection lifecycle as reported by the host's MCP hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Connected,
    Connecting,
    Disconnected,
}

/// Where a server's config entry lives. The host omits the field for
/// global servers, so the default covers both spellings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerSource {
    #[default]
    Global,
    Project,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub always_allow: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpResource {
    pub uri: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpResourceTemplate {
    pub uri_template: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorLevel {
    #[default]
    Error,
    Warn,
    Info,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpErrorEntry {
    pub message: String,
    /// Milliseconds since the epoch, as the host reports it.
    pub timestamp: i64,
    #[serde(default)]
    pub level: ErrorLevel,
}

/// One MCP server as pushed by the host. The raw config stays a string;
/// the host owns its schema and this side only peeks at the timeout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpServer {
    pub name: String,
    pub config: String,
    pub status: ServerStatus,
    #[serde(default)]
    pub source: ServerSource,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub tools: Vec<McpTool>,
    #[serde(default)]
    pub resources: Vec<McpResource>,
    #[serde(default)]
    pub resource_templates: Vec<McpResourceTemplate>,
    #[serde(default)]
    pub error_history: Vec<McpErrorEntry>,
}

impl McpServer {
    /// Per-server network timeout from the raw config JSON. A missing key
    /// and malformed JSON both fall back to the default silently; the
    /// host validates configs on its side.
    pub fn configured_timeout_secs(&self) -> u64 {
        serde_json::from_str::<Value>(&self.config)
            .ok()
            .and_then(|config| config.get("timeout")?.as_u64())
            .unwrap_or(DEFAULT_NETWORK_TIMEOUT_SECS)
    }

    /// Concrete resources plus templates, the count the resources tab
    /// shows.
    pub fn resource_count(&self) -> usize {
        self.resources.len() + self.resource_templates.len()
    }
}

/// Per-row UI state layered over one [`McpServer`]: expand/collapse, the
/// two-step delete confirmation, and the locally edited timeout. Row
/// actions go out through a [`HostBridge`]; the host answers with a fresh
/// server list rather than a reply.
#[derive(Debug)]
pub struct ServerRowState {
    server: McpServer,
    expanded: bool,
    delete_pending: bool,
    timeout_secs: u64,
}

impl ServerRowState {
    pub fn new(server: McpServer) -> Self {
        let timeout_secs = server.configured_timeout_secs();
        Self {
            server,
            expanded: false,
            delete_pending: false,
            timeout_secs,
        }
    }

    pub fn server(&self) -> &McpServer {
        &self.server
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn delete_pending(&self) -> bool {
        self.delete_pending
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Clicking the row toggles the detail view, but only a connected
    /// server has details to show.
    pub fn toggle_expanded(&mut self) {
        if self.server.status == ServerStatus::Connected {
            self.expanded = !self.expanded;
        }
    }

    /// Ask the host to restart this server. Ignored while a connection
    /// attempt is already in flight.
    pub fn restart(&self, bridge: &dyn HostBridge) {
        if self.server.status == ServerStatus::Connecting {
            return;
        }
        bridge.post(HostCommand::RestartMcpServer {
            text: self.server.name.clone(),
            source: self.server.source,
        });
    }

    /// Change the network timeout. Values outside the dropdown's option
    /// list are ignored; the host never sees them.
    pub fn set_timeout(&mut self, secs: u64, bridge: &dyn HostBridge) {
        if !NETWORK_TIMEOUT_OPTIONS_SECS.contains(&secs) {
            return;
        }
        self.timeout_secs = secs;
        bridge.post(HostCommand::UpdateMcpTimeout {
            server_name: self.server.name.clone(),
            source: self.server.source,
            timeout: secs,
        });
    }

    pub fn set_enabled(&self, enabled: bool, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::ToggleMcpServer {
            server_name: self.server.name.clone(),
            source: self.server.source,
            disabled: !enabled,
        });
    }

    pub fn set_tool_always_allow(&self, tool_name: &str, allow: bool, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::ToggleToolAlwaysAllow {
            server_name: self.server.name.clone(),
            source: self.server.source,
            tool_name: tool_name.to_string(),
            always_allow: allow,
        });
    }

    /// First step of deletion: arm the confirmation dialog.
    pub fn request_delete(&mut self) {
        self.delete_pending = true;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_pending = false;
    }

    /// Second step: actually ask the host to delete, and disarm.
    pub fn confirm_delete(&mut self, bridge: &dyn HostBridge) {
        if !self.delete_pending {
            return;
        }
        bridge.post(HostCommand::DeleteMcpServer {
            server_name: self.server.name.clone(),
            source: self.server.source,
        });
        self.delete_pending = false;
    }

    /// Error history newest-first, the order the errors tab renders.
    pub fn errors_newest_first(&self) -> Vec<&McpErrorEntry> {
        let mut errors: Vec<&McpErrorEntry> = self.server.error_history.iter().collect();
        errors.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        errors
    }

    /// Swap in fresh server data while keeping the row's UI state. The
    /// timeout stays at its locally edited value; the host echoes config
    /// changes back through this same path.
    fn update_server(&mut self, server: McpServer) {
        self.server = server;
    }
}

/// The MCP section of the settings page: the server rows plus the
/// section-level toggles and buttons around them.
#[derive(Debug)]
pub struct McpPanel {
    mcp_enabled: bool,
    enable_server_creation: bool,
    always_allow_mcp: bool,
    rows: Vec<ServerRowState>,
}

impl McpPanel {
    pub fn new(settings: &PanelSettings) -> Self {
        Self {
            mcp_enabled: settings.mcp_enabled,
            enable_server_creation: settings.enable_mcp_server_creation,
            always_allow_mcp: settings.always_allow_mcp,
            rows: Vec::new(),
        }
    }

    pub fn mcp_enabled(&self) -> bool {
        self.mcp_enabled
    }

    pub fn server_creation_enabled(&self) -> bool {
        self.enable_server_creation
    }

    pub fn always_allow_mcp(&self) -> bool {
        self.always_allow_mcp
    }

    pub fn rows(&self) -> &[ServerRowState] {
        &self.rows
    }

    pub fn row_mut(&mut self, name: &str, source: ServerSource) -> Option<&mut ServerRowState> {
        self.rows
            .iter_mut()
            .find(|row| row.server.name == name && row.server.source == source)
    }

    /// Replace the server list with a fresh host push. Rows that survive
    /// (matched by name and source) keep their expand/collapse and
    /// confirmation state; new servers start collapsed.
    pub fn sync_servers(&mut self, servers: Vec<McpServer>) {
        let mut previous = std::mem::take(&mut self.rows);
        self.rows = servers
            .into_iter()
            .map(|server| {
                let existing = previous.iter().position(|row| {
                    row.server.name == server.name && row.server.source == server.source
                });
                match existing {
                    Some(index) => {
                        let mut row = previous.swap_remove(index);
                        row.update_server(server);
                        row
                    }
                    None => ServerRowState::new(server),
                }
            })
            .collect();
    }

    /// Absorb a fresh settings snapshot. Only the section flags refresh;
    /// row UI state stays untouched, so the echo the host sends after
    /// [`set_server_creation`](McpPanel::set_server_creation) does not
    /// collapse open rows.
    pub fn sync_settings(&mut self, settings: &PanelSettings) {
        self.mcp_enabled = settings.mcp_enabled;
        self.enable_server_creation = settings.enable_mcp_server_creation;
        self.always_allow_mcp = settings.always_allow_mcp;
    }

    pub fn set_server_creation(&mut self, enabled: bool, bridge: &dyn HostBridge) {
        self.enable_server_creation = enabled;
        bridge.post(HostCommand::EnableMcpServerCreation { value: enabled });
    }

    pub fn open_global_settings(&self, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::OpenMcpSettings);
    }

    pub fn open_project_settings(&self, bridge: &dyn HostBridge) {
        bridge.post(HostCommand::OpenProjectMcpSettings);
    }
}
