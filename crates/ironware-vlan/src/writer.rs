//! Plans IronWare commands moving an interface to a desired VLAN state.
//!
//! Planning is pure. The caller reads the current state with
//! [`read_interface_vlans`](crate::read_interface_vlans) and applies the
//! returned command blocks through whatever pushes configuration to the
//! device.

use cli_unit_common::{UnitError, UnitResult};
use cli_vlan_types::{compress, expand, RangeToken, VlanId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

use crate::classifier::PortRef;
use crate::commands::{
    build_add_tagged_member_cmd, build_add_untagged_member_cmd, build_remove_tagged_member_cmd,
    build_remove_untagged_member_cmd,
};
use crate::model::{InterfaceMode, InterfaceVlanConfig};

/// Desired switched-VLAN state of one interface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchedVlanIntent {
    /// Switchport mode
    pub mode: InterfaceMode,
    /// Untagged VLAN in access mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_vlan: Option<VlanId>,
    /// Untagged VLAN in trunk mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<VlanId>,
    /// Tagged VLANs in range notation
    #[serde(default)]
    pub trunk_vlans: Vec<RangeToken>,
}

impl SwitchedVlanIntent {
    /// Access port on `vlan`
    pub fn access(vlan: VlanId) -> Self {
        Self {
            mode: InterfaceMode::Access,
            access_vlan: Some(vlan),
            native_vlan: None,
            trunk_vlans: Vec::new(),
        }
    }

    /// Trunk port carrying `trunk_vlans`, optionally with a native VLAN
    pub fn trunk(trunk_vlans: Vec<RangeToken>, native_vlan: Option<VlanId>) -> Self {
        Self {
            mode: InterfaceMode::Trunk,
            access_vlan: None,
            native_vlan,
            trunk_vlans,
        }
    }
}

/// Membership an interface ends up with, in device terms.
///
/// `untagged` may be VLAN 1; the device only needs an explicit command for
/// it when the port was excluded from VLAN 1.
#[derive(Debug, PartialEq, Eq)]
struct Membership {
    tagged: BTreeSet<VlanId>,
    untagged: Option<VlanId>,
    default_excluded: bool,
}

impl Membership {
    fn from_config(config: &InterfaceVlanConfig) -> Self {
        let tagged = match config.mode {
            Some(InterfaceMode::Trunk) => config.trunk_vlans.clone(),
            _ => BTreeSet::new(),
        };
        Self {
            tagged,
            untagged: config.untagged_vlan(),
            default_excluded: config.default_vlan_excluded,
        }
    }

    fn default_vlan() -> Self {
        Self {
            tagged: BTreeSet::new(),
            untagged: Some(VlanId::DEFAULT),
            default_excluded: false,
        }
    }

    fn vlans(&self) -> impl Iterator<Item = VlanId> + '_ {
        self.tagged.iter().copied().chain(self.untagged)
    }
}

/// Resolves `interface` to the canonical name of an Ethernet port
fn switched_port(interface: &str) -> UnitResult<String> {
    match PortRef::parse(interface) {
        Some(port @ PortRef::Ethernet { .. }) => Ok(port.canonical()),
        _ => Err(UnitError::precondition(format!(
            "interface '{}' is not an Ethernet port and cannot carry switched VLANs",
            interface
        ))),
    }
}

/// Checks the intent against itself and returns the membership it asks for
fn desired_membership(interface: &str, intent: &SwitchedVlanIntent) -> UnitResult<Membership> {
    let trunk: BTreeSet<VlanId> = expand(&intent.trunk_vlans)?.into_iter().collect();

    match intent.mode {
        InterfaceMode::Access => {
            let Some(access) = intent.access_vlan else {
                return Err(UnitError::precondition(format!(
                    "access mode on {} requires an access VLAN",
                    interface
                )));
            };
            if !trunk.is_empty() {
                return Err(UnitError::precondition(format!(
                    "access mode on {} cannot carry trunk VLANs",
                    interface
                )));
            }
            if intent.native_vlan.is_some() {
                return Err(UnitError::precondition(format!(
                    "access mode on {} cannot set a native VLAN",
                    interface
                )));
            }
            Ok(Membership {
                tagged: BTreeSet::new(),
                untagged: Some(access),
                default_excluded: false,
            })
        }
        InterfaceMode::Trunk => {
            if intent.access_vlan.is_some() {
                return Err(UnitError::precondition(format!(
                    "trunk mode on {} cannot set an access VLAN",
                    interface
                )));
            }
            if trunk.is_empty() {
                return Err(UnitError::precondition(format!(
                    "trunk mode on {} requires at least one trunk VLAN",
                    interface
                )));
            }
            if let Some(native) = intent.native_vlan.filter(|id| trunk.contains(id)) {
                return Err(UnitError::precondition(format!(
                    "native VLAN {} on {} is also a trunk VLAN",
                    native, interface
                )));
            }
            Ok(Membership {
                tagged: trunk,
                untagged: intent.native_vlan,
                default_excluded: false,
            })
        }
    }
}

/// Plans the commands moving `interface` from `current` to `intent`.
///
/// Every VLAN the intent references must be in `known_vlans`. Commands are
/// ordered untagged removal, tagged removals, tagged additions, untagged
/// addition, so a VLAN can switch between tagged and untagged in one plan.
/// An empty plan means the interface is already in the desired state.
#[instrument(skip(current, intent, known_vlans))]
pub fn plan_interface_vlans(
    interface: &str,
    current: &InterfaceVlanConfig,
    intent: &SwitchedVlanIntent,
    known_vlans: &BTreeSet<VlanId>,
) -> UnitResult<Vec<String>> {
    let port = switched_port(interface)?;
    let desired = desired_membership(&port, intent)?;

    if let Some(missing) = desired.vlans().find(|id| !known_vlans.contains(id)) {
        return Err(UnitError::precondition(format!(
            "VLAN {} referenced by {} is not configured on the device",
            missing, port
        )));
    }

    let existing = Membership::from_config(current);
    let commands = diff(&port, &existing, &desired);
    debug!(interface = %port, commands = commands.len(), "Planned VLAN changes");
    Ok(commands)
}

/// Plans the commands removing every VLAN membership of `interface`.
///
/// The port falls back to the default VLAN, and is added back to it
/// explicitly if it was `no untagged` there.
#[instrument(skip(current))]
pub fn plan_interface_removal(
    interface: &str,
    current: &InterfaceVlanConfig,
) -> UnitResult<Vec<String>> {
    let port = switched_port(interface)?;
    let existing = Membership::from_config(current);
    Ok(diff(&port, &existing, &Membership::default_vlan()))
}

fn diff(port: &str, existing: &Membership, desired: &Membership) -> Vec<String> {
    let mut commands = Vec::new();

    if existing.untagged != desired.untagged {
        if let Some(vlan) = existing.untagged.filter(|id| !id.is_default()) {
            info!("Removing {} from VLAN {} untagged", port, vlan);
            commands.push(build_remove_untagged_member_cmd(vlan, port));
        }
    }

    let stale: Vec<VlanId> = existing.tagged.difference(&desired.tagged).copied().collect();
    for token in compress(&stale) {
        info!("Removing {} from VLAN {} tagged", port, token);
        commands.push(build_remove_tagged_member_cmd(&token, port));
    }

    let missing: Vec<VlanId> = desired.tagged.difference(&existing.tagged).copied().collect();
    for token in compress(&missing) {
        info!("Adding {} to VLAN {} tagged", port, token);
        commands.push(build_add_tagged_member_cmd(&token, port));
    }

    if existing.untagged != desired.untagged {
        // Leaving the last untagged VLAN rejoins VLAN 1 unless excluded from it
        let rejoin = |id: &VlanId| !id.is_default() || existing.default_excluded;
        if let Some(vlan) = desired.untagged.filter(rejoin) {
            info!("Adding {} to VLAN {} untagged", port, vlan);
            commands.push(build_add_untagged_member_cmd(vlan, port));
        }
    }

    commands
}
