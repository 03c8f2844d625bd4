//! Derives an interface's switchport configuration from VLAN membership.

use cli_vlan_types::VlanId;
use tracing::debug;

use crate::model::{InterfaceKey, InterfaceMode, InterfaceVlanConfig, TagKind, Vlan};

/// Projects VLAN membership onto one interface.
///
/// Rules, in order:
///
/// 1. If VLAN 1 is present and the interface is not `no untagged` in it,
///    the interface starts in access mode on VLAN 1. Otherwise the
///    exclusion is recorded in `default_vlan_excluded`.
/// 2. Walking VLANs in order, for each one:
///    - a `tagged` membership adds the VLAN to the trunk set and switches to
///      trunk mode; a non-default access VLAN held so far becomes the native
///      VLAN;
///    - then an `untagged` membership sets the native VLAN in trunk mode,
///      or the access VLAN otherwise.
///
/// The last untagged match wins. Router-interface entries carry no tag and
/// never contribute.
pub fn project(interface: &str, vlans: &[Vlan]) -> InterfaceVlanConfig {
    let key = InterfaceKey::new(interface);
    let mut config = InterfaceVlanConfig::default();

    let mut default_vlans = vlans.iter().filter(|vlan| vlan.id().is_default()).peekable();
    let has_default = default_vlans.peek().is_some();
    config.default_vlan_excluded =
        default_vlans.any(|vlan| vlan.has_membership(&key, TagKind::NoUntagged));
    if has_default && !config.default_vlan_excluded {
        config.mode = Some(InterfaceMode::Access);
        config.access_vlan = Some(VlanId::DEFAULT);
    }

    for vlan in vlans {
        if vlan.has_membership(&key, TagKind::Tagged) {
            if config.mode == Some(InterfaceMode::Access) {
                if let Some(access) = config.access_vlan.filter(|id| !id.is_default()) {
                    config.native_vlan = Some(access);
                }
            }
            config.trunk_vlans.insert(vlan.id());
            config.mode = Some(InterfaceMode::Trunk);
            config.access_vlan = None;
        }

        if vlan.has_membership(&key, TagKind::Untagged) {
            if config.mode == Some(InterfaceMode::Trunk) {
                config.native_vlan = Some(vlan.id());
            } else {
                config.mode = Some(InterfaceMode::Access);
                config.access_vlan = Some(vlan.id());
            }
        }
    }

    debug!(
        interface = %key.name(),
        mode = ?config.mode,
        access = ?config.access_vlan,
        native = ?config.native_vlan,
        trunk = config.trunk_vlans.len(),
        "Projected interface VLANs"
    );
    config
}
