use crate::host::{ActionValues, HostAction, HostBridge, HostCommand, MarketplaceTab};

/// Deep links into the marketplace view. The host routes these as a
/// generic `action` message with the target tab in the payload, so other
/// surfaces (the mode selector, walkthroughs) can reuse the same path.
pub fn open_mcp_marketplace(bridge: &dyn HostBridge) {
    bridge.post(deep_link(MarketplaceTab::Mcp));
}

pub fn open_mode_marketplace(bridge: &dyn HostBridge) {
    bridge.post(deep_link(MarketplaceTab::Mode));
}

fn deep_link(tab: MarketplaceTab) -> HostCommand {
    HostCommand::Action {
        action: HostAction::MarketplaceButtonClicked,
        values: ActionValues {
            marketplace_tab: tab,
        },
    }
}
