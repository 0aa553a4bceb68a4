use serde::Serialize;
use tokio::sync::mpsc;
use tracing::trace;

use crate::panel::mcp::ServerSource;

/// Side-panel tabs the host can be asked to switch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTab {
    Marketplace,
    Modes,
}

/// Marketplace tabs addressable through a deep link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketplaceTab {
    Mcp,
    Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HostAction {
    MarketplaceButtonClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionValues {
    pub marketplace_tab: MarketplaceTab,
}

/// One-way messages the panel sends to the extension host.
///
/// Serialized shapes match the host's postMessage vocabulary exactly,
/// quirks included: restart carries the server name in a `text` field, and
/// the server-creation toggle carries its flag in a field named `bool`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostCommand {
    RestartMcpServer {
        text: String,
        source: ServerSource,
    },
    #[serde(rename_all = "camelCase")]
    UpdateMcpTimeout {
        server_name: String,
        source: ServerSource,
        timeout: u64,
    },
    #[serde(rename_all = "camelCase")]
    DeleteMcpServer {
        server_name: String,
        source: ServerSource,
    },
    #[serde(rename_all = "camelCase")]
    ToggleMcpServer {
        server_name: String,
        source: ServerSource,
        disabled: bool,
    },
    #[serde(rename_all = "camelCase")]
    ToggleToolAlwaysAllow {
        server_name: String,
        source: ServerSource,
        tool_name: String,
        always_allow: bool,
    },
    EnableMcpServerCreation {
        #[serde(rename = "bool")]
        value: bool,
    },
    OpenMcpSettings,
    OpenProjectMcpSettings,
    SwitchTab {
        tab: PanelTab,
    },
    Action {
        action: HostAction,
        values: ActionValues,
    },
}

/// Capability the view-models use to reach the host.
///
/// Posting is fire-and-forget: delivery cannot be observed and a dead
/// endpoint silently drops the command.
pub trait HostBridge {
    fn post(&self, command: HostCommand);
}

/// [`HostBridge`] over a tokio unbounded channel. The embedding
/// application owns the receiving half and forwards commands to the real
/// transport.
pub struct ChannelBridge {
    tx: mpsc::UnboundedSender<HostCommand>,
}

impl ChannelBridge {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<HostCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl HostBridge for ChannelBridge {
    fn post(&self, command: HostCommand) {
        trace!(?command, "posting host command");
        // Receiver gone means the host side shut down; the command drops.
        let _ = self.tx.send(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn restart_uses_the_legacy_text_field() {
        let command = HostCommand::RestartMcpServer {
            text: "weather".to_string(),
            source: ServerSource::Global,
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({ "type": "restartMcpServer", "text": "weather", "source": "global" })
        );
    }

    #[test]
    fn timeout_update_wire_shape() {
        let command = HostCommand::UpdateMcpTimeout {
            server_name: "weather".to_string(),
            source: ServerSource::Project,
            timeout: 300,
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "type": "updateMcpTimeout",
                "serverName": "weather",
                "source": "project",
                "timeout": 300,
            })
        );
    }

    #[test]
    fn tool_always_allow_wire_shape() {
        let command = HostCommand::ToggleToolAlwaysAllow {
            server_name: "weather".to_string(),
            source: ServerSource::Global,
            tool_name: "forecast".to_string(),
            always_allow: true,
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({
                "type": "toggleToolAlwaysAllow",
                "serverName": "weather",
                "source": "global",
                "toolName": "forecast",
                "alwaysAllow": true,
            })
        );
    }

    #[test]
    fn server_creation_toggle_uses_the_bool_field() {
        let command = HostCommand::EnableMcpServerCreation { value: true };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({ "type": "enableMcpServerCreation", "bool": true })
        );
    }

    #[test]
    fn bare_commands_carry_only_their_type() {
        assert_eq!(
            serde_json::to_value(HostCommand::OpenMcpSettings).unwrap(),
            json!({ "type": "openMcpSettings" })
        );
        assert_eq!(
            serde_json::to_value(HostCommand::OpenProjectMcpSettings).unwrap(),
            json!({ "type": "openProjectMcpSettings" })
        );
    }

    #[test]
    fn switch_tab_wire_shape() {
        let command = HostCommand::SwitchTab {
            tab: PanelTab::Marketplace,
        };
        assert_eq!(
            serde_json::to_value(&command).unwrap(),
            json!({ "type": "switchTab", "tab": "marketplace" })
        );
    }

    #[test]
    fn channel_bridge_delivers_in_order() {
        let (bridge, mut rx) = ChannelBridge::new();
        bridge.post(HostCommand::OpenMcpSettings);
        bridge.post(HostCommand::SwitchTab {
            tab: PanelTab::Modes,
        });

        assert_eq!(rx.try_recv().unwrap(), HostCommand::OpenMcpSettings);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostCommand::SwitchTab {
                tab: PanelTab::Modes
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn posting_to_a_closed_channel_is_silent() {
        let (bridge, rx) = ChannelBridge::new();
        drop(rx);
        bridge.post(HostCommand::OpenMcpSettings);
    }
}
