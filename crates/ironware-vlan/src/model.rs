//! VLAN membership model built from parsed CLI output

use cli_vlan_types::{compress, RangeToken, VlanId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::iter;
use std::str::FromStr;

use crate::classifier::{canonical_interface, PortRef};

/// Keyword a membership was declared under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    /// `tagged`
    Tagged,
    /// `untagged`
    Untagged,
    /// `no untagged`, removal from the default VLAN
    NoUntagged,
    /// `router-interface`
    RouterInterface,
}

impl TagKind {
    /// Maps a clause keyword to its tag kind
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "tagged" => TagKind::Tagged,
            "untagged" => TagKind::Untagged,
            "no untagged" => TagKind::NoUntagged,
            "router-interface" => TagKind::RouterInterface,
            _ => return None,
        })
    }

    /// Convert to the CLI keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Tagged => "tagged",
            TagKind::Untagged => "untagged",
            TagKind::NoUntagged => "no untagged",
            TagKind::RouterInterface => "router-interface",
        }
    }
}

/// An interface as looked up against membership entries.
///
/// Built once per lookup so every entry compares against the same
/// canonical name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceKey {
    canonical: String,
    port: Option<PortRef>,
}

impl InterfaceKey {
    /// Canonicalizes `name`
    pub fn new(name: &str) -> Self {
        Self {
            canonical: canonical_interface(name),
            port: PortRef::parse(name),
        }
    }

    /// Canonical interface name
    pub fn name(&self) -> &str {
        &self.canonical
    }

    /// Parsed port, if the name has a known shape
    pub fn port(&self) -> Option<&PortRef> {
        self.port.as_ref()
    }
}

/// One association between a VLAN and an interface reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MembershipEntry {
    /// Exactly one port, by canonical name
    Single { tag: TagKind, interface: String },
    /// `<slot_low>/<port_low> to <slot_high>/<port_high>`
    Range {
        tag: TagKind,
        slot_low: u32,
        slot_high: u32,
        port_low: u32,
        port_high: u32,
    },
    /// Routed interface `ve <port>`; carries no tag kind
    RouterInterface { port: String },
}

impl MembershipEntry {
    /// Tag kind of the clause the entry came from. Router interfaces have
    /// none, even when listed under a `router-interface` clause.
    pub fn tag(&self) -> Option<TagKind> {
        match self {
            MembershipEntry::Single { tag, .. } | MembershipEntry::Range { tag, .. } => Some(*tag),
            MembershipEntry::RouterInterface { .. } => None,
        }
    }

    /// Returns true if the entry covers `interface`.
    ///
    /// A range only matches when it stays on one slot.
    pub fn matches(&self, interface: &InterfaceKey) -> bool {
        match (self, interface.port()) {
            (MembershipEntry::Single { interface: name, .. }, _) => *name == interface.canonical,
            (
                MembershipEntry::Range {
                    slot_low,
                    slot_high,
                    port_low,
                    port_high,
                    ..
                },
                Some(PortRef::Ethernet { slot, port }),
            ) => slot == slot_low && slot == slot_high && (*port_low..=*port_high).contains(port),
            (MembershipEntry::RouterInterface { port: entry }, Some(PortRef::Ve { port })) => {
                entry == port
            }
            _ => false,
        }
    }

    /// Concrete interface names covered by the entry.
    ///
    /// Ranges enumerate `port_low..=port_high` on `slot_low` lazily.
    pub fn interfaces(&self) -> Box<dyn Iterator<Item = String> + '_> {
        match self {
            MembershipEntry::Single { interface, .. } => Box::new(iter::once(interface.clone())),
            MembershipEntry::Range {
                slot_low,
                port_low,
                port_high,
                ..
            } => Box::new((*port_low..=*port_high).map(move |port| {
                PortRef::Ethernet {
                    slot: *slot_low,
                    port,
                }
                .canonical()
            })),
            MembershipEntry::RouterInterface { port } => {
                Box::new(iter::once(PortRef::Ve { port: port.clone() }.canonical()))
            }
        }
    }
}

/// One VLAN block from a CLI dump.
///
/// The same VLAN may appear in several blocks; they are kept apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vlan {
    id: VlanId,
    name: Option<String>,
    members: Vec<MembershipEntry>,
}

impl Vlan {
    /// Create a new Vlan
    pub fn new(id: VlanId, name: Option<String>, members: Vec<MembershipEntry>) -> Self {
        Self { id, name, members }
    }

    /// VLAN ID
    pub fn id(&self) -> VlanId {
        self.id
    }

    /// Name from the header, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Membership entries in parse order
    pub fn members(&self) -> &[MembershipEntry] {
        &self.members
    }

    /// Returns true if `interface` is a member under `tag`
    pub fn has_membership(&self, interface: &InterfaceKey, tag: TagKind) -> bool {
        self.members
            .iter()
            .any(|m| m.tag() == Some(tag) && m.matches(interface))
    }
}

/// Switchport mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceMode {
    /// One untagged VLAN
    Access,
    /// Tagged VLANs plus an optional native VLAN
    Trunk,
}

impl InterfaceMode {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceMode::Access => "access",
            InterfaceMode::Trunk => "trunk",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "access" => Ok(InterfaceMode::Access),
            "trunk" => Ok(InterfaceMode::Trunk),
            _ => Err(format!("invalid interface mode '{}' (expected access or trunk)", s)),
        }
    }
}

/// VLAN configuration of one interface, as derived from membership.
///
/// Trunk mode never has an access VLAN; access mode never has trunk VLANs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceVlanConfig {
    /// Switchport mode, unset when nothing is known
    pub mode: Option<InterfaceMode>,
    /// Untagged VLAN in access mode
    pub access_vlan: Option<VlanId>,
    /// Untagged VLAN in trunk mode
    pub native_vlan: Option<VlanId>,
    /// Tagged VLANs
    pub trunk_vlans: BTreeSet<VlanId>,
    /// The port is `no untagged` in VLAN 1 and will not fall back to it
    #[serde(default)]
    pub default_vlan_excluded: bool,
}

impl InterfaceVlanConfig {
    /// Trunk VLANs in range notation, for rendering
    pub fn trunk_ranges(&self) -> Vec<RangeToken> {
        compress(&self.trunk_vlans.iter().copied().collect::<Vec<_>>())
    }

    /// Untagged VLAN for the current mode
    pub fn untagged_vlan(&self) -> Option<VlanId> {
        match self.mode {
            Some(InterfaceMode::Access) => self.access_vlan,
            Some(InterfaceMode::Trunk) => self.native_vlan,
            None => None,
        }
    }
}
