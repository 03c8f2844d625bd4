//! IronWare command builders for VLAN membership changes

use cli_vlan_types::{RangeToken, VlanId};

use crate::model::TagKind;

/// Command listing VLANs with their members
pub const SHOW_VLAN_CMD: &str = "show running-config vlan";

/// Leaves a configuration sub-mode
pub const EXIT_CMD: &str = "exit";

/// Build the `vlan` line entering one VLAN or a run of VLANs
///
/// Ranges use the device syntax `vlan <start> to <end>`.
pub fn build_vlan_scope_cmd(token: &RangeToken) -> String {
    match token {
        RangeToken::Single(vlan) => format!("vlan {}", vlan),
        RangeToken::Range(start, end) => format!("vlan {} to {}", start, end),
    }
}

fn build_member_block(token: &RangeToken, clause: &str, interface: &str) -> String {
    format!(
        "{}\n{} {}\n{}",
        build_vlan_scope_cmd(token),
        clause,
        interface,
        EXIT_CMD
    )
}

/// Build add tagged member command
pub fn build_add_tagged_member_cmd(token: &RangeToken, interface: &str) -> String {
    build_member_block(token, TagKind::Tagged.as_str(), interface)
}

/// Build remove tagged member command
pub fn build_remove_tagged_member_cmd(token: &RangeToken, interface: &str) -> String {
    build_member_block(token, &format!("no {}", TagKind::Tagged.as_str()), interface)
}

/// Build add untagged member command
pub fn build_add_untagged_member_cmd(vlan: VlanId, interface: &str) -> String {
    build_member_block(
        &RangeToken::Single(vlan),
        TagKind::Untagged.as_str(),
        interface,
    )
}

/// Build remove untagged member command
///
/// The device returns the port to the default VLAN on its own.
pub fn build_remove_untagged_member_cmd(vlan: VlanId, interface: &str) -> String {
    build_member_block(
        &RangeToken::Single(vlan),
        &format!("no {}", TagKind::Untagged.as_str()),
        interface,
    )
}
