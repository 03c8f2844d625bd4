//! Recognizers for IronWare VLAN configuration lines.
//!
//! Lines are expected to be whitespace-squashed (see [`squash`]). Grammar:
//!
//! ```text
//! vlan <id>[ name <name>] ...
//! (tagged|no untagged|untagged|router-interface) <ifc-ref>+
//! <ifc-ref> ::= e(the(rnet)?)? <slot>/<port>[ to <slot>/<port>] | ve <port>
//! ```
//!
//! Anything else is ignored.

use cli_vlan_types::VlanId;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{MembershipEntry, TagKind};

/// One interface reference inside a tag clause.
const IFC_REF: &str = r"(?:e(?:the(?:rnet)?)? \d+/\d+(?: to \d+/\d+)?|ve \d+)";

static VLAN_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^vlan (\d+)(?: name (\S+))?").expect("Invalid regex pattern"));

static TAG_CLAUSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"\b(tagged|no untagged|untagged|router-interface)((?: {})+)",
        IFC_REF
    ))
    .expect("Invalid regex pattern")
});

static RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\be(?:the(?:rnet)?)? (\d+)/(\d+) to (\d+)/(\d+)").expect("Invalid regex pattern")
});

// The optional " to" marks the start of a range; such matches are skipped.
static SINGLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\be(?:the(?:rnet)?)? (\d+)/(\d+)( to)?").expect("Invalid regex pattern")
});

static ROUTER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bve (\d+)").expect("Invalid regex pattern"));

static ETHERNET_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ethernet|ethe|eth|e) ?(\d+)/(\d+)$").expect("Invalid regex pattern")
});

static VE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ve ?(\d+)$").expect("Invalid regex pattern"));

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn squash(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns true for lines that close the current VLAN block.
pub fn is_block_terminator(line: &str) -> bool {
    matches!(line, "!" | "exit")
}

/// A recognized `vlan <id>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanHeader {
    /// VLAN ID, `None` when the number is outside 1-4094
    pub id: Option<VlanId>,
    /// Optional `name <name>` suffix
    pub name: Option<String>,
}

/// Matches a VLAN header at the start of `line`.
pub fn vlan_header(line: &str) -> Option<VlanHeader> {
    let caps = VLAN_HEADER_RE.captures(line)?;
    let id = caps[1].parse::<u16>().ok().and_then(|id| VlanId::new(id).ok());
    Some(VlanHeader {
        id,
        name: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// A tag keyword together with the interface references following it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClause {
    /// Tag kind given by the keyword
    pub kind: TagKind,
    /// Raw interface reference text
    pub refs: String,
}

impl TagClause {
    /// Resolves the clause into membership entries.
    ///
    /// Each category is matched over the whole reference text on its own:
    /// ranges first, then single ports not consumed by a range, then router
    /// interfaces.
    pub fn members(&self) -> Vec<MembershipEntry> {
        let mut members = Vec::new();

        for caps in RANGE_RE.captures_iter(&self.refs) {
            let (Some(slot_low), Some(port_low), Some(slot_high), Some(port_high)) = (
                number(&caps[1]),
                number(&caps[2]),
                number(&caps[3]),
                number(&caps[4]),
            ) else {
                continue;
            };
            members.push(MembershipEntry::Range {
                tag: self.kind,
                slot_low,
                slot_high,
                port_low,
                port_high,
            });
        }

        for caps in SINGLE_RE.captures_iter(&self.refs) {
            if caps.get(3).is_some() {
                continue;
            }
            let (Some(slot), Some(port)) = (number(&caps[1]), number(&caps[2])) else {
                continue;
            };
            members.push(MembershipEntry::Single {
                tag: self.kind,
                interface: PortRef::Ethernet { slot, port }.canonical(),
            });
        }

        for caps in ROUTER_RE.captures_iter(&self.refs) {
            let Some(port) = number(&caps[1]) else {
                continue;
            };
            members.push(MembershipEntry::RouterInterface {
                port: port.to_string(),
            });
        }

        members
    }
}

fn number(s: &str) -> Option<u32> {
    s.parse().ok()
}

/// Extracts every tag clause in `line`, in order of appearance.
pub fn tag_clauses(line: &str) -> Vec<TagClause> {
    TAG_CLAUSE_RE
        .captures_iter(line)
        .filter_map(|caps| {
            Some(TagClause {
                kind: TagKind::from_keyword(&caps[1])?,
                refs: caps[2].trim().to_string(),
            })
        })
        .collect()
}

/// A concrete interface named by a user or a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PortRef {
    /// Physical port `<slot>/<port>`
    Ethernet { slot: u32, port: u32 },
    /// Routed VLAN interface `ve <port>`
    Ve { port: String },
}

impl PortRef {
    /// Parses an interface name such as `ethernet 1/1`, `e 1/1` or `ve 12`.
    pub fn parse(name: &str) -> Option<PortRef> {
        let name = squash(name).to_lowercase();
        if let Some(caps) = ETHERNET_NAME_RE.captures(&name) {
            return Some(PortRef::Ethernet {
                slot: number(&caps[1])?,
                port: number(&caps[2])?,
            });
        }
        let caps = VE_NAME_RE.captures(&name)?;
        Some(PortRef::Ve {
            port: number(&caps[1])?.to_string(),
        })
    }

    /// Canonical spelling used for comparison and rendering.
    pub fn canonical(&self) -> String {
        match self {
            PortRef::Ethernet { slot, port } => format!("ethernet {}/{}", slot, port),
            PortRef::Ve { port } => format!("ve {}", port),
        }
    }
}

/// Canonical form of any interface name; unknown shapes are squashed and
/// lowercased.
pub fn canonical_interface(name: &str) -> String {
    match PortRef::parse(name) {
        Some(port) => port.canonical(),
        None => squash(name).to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn single(tag: TagKind, name: &str) -> MembershipEntry {
        MembershipEntry::Single {
            tag,
            interface: name.to_string(),
        }
    }

    #[test]
    fn test_squash() {
        assert_eq!(squash("  tagged   ethe 1/1\t ethe 1/2 "), "tagged ethe 1/1 ethe 1/2");
        assert_eq!(squash("   "), "");
    }

    #[test]
    fn test_vlan_header() {
        assert_eq!(
            vlan_header("vlan 1 name DEFAULT-VLAN by port"),
            Some(VlanHeader {
                id: VlanId::new(1).ok(),
                name: Some("DEFAULT-VLAN".to_string()),
            })
        );
        assert_eq!(
            vlan_header("vlan 100 by port"),
            Some(VlanHeader {
                id: VlanId::new(100).ok(),
                name: None,
            })
        );
        assert_eq!(vlan_header("tagged ethe 1/1"), None);
        assert_eq!(vlan_header("show vlan 100"), None);
    }

    #[test]
    fn test_vlan_header_out_of_domain() {
        assert_eq!(vlan_header("vlan 4095").unwrap().id, None);
        assert_eq!(vlan_header("vlan 99999999").unwrap().id, None);
    }

    #[test]
    fn test_tag_clause_keywords() {
        let clauses = tag_clauses("tagged ethe 1/1 untagged ethe 1/2 no untagged ethe 1/3");
        let kinds: Vec<TagKind> = clauses.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![TagKind::Tagged, TagKind::Untagged, TagKind::NoUntagged]
        );
        assert_eq!(clauses[0].refs, "ethe 1/1");
    }

    #[test]
    fn test_tag_clause_requires_references() {
        assert!(tag_clauses("untagged").is_empty());
        assert!(tag_clauses("spanning-tree 802-1w").is_empty());
        assert!(tag_clauses("tagged lag 1").is_empty());
    }

    #[test]
    fn test_interface_keyword_spellings() {
        for line in [
            "tagged e 1/7",
            "tagged ethe 1/7",
            "tagged ethernet 1/7",
        ] {
            let members: Vec<_> = tag_clauses(line).iter().flat_map(TagClause::members).collect();
            assert_eq!(members, vec![single(TagKind::Tagged, "ethernet 1/7")], "{}", line);
        }
    }

    #[test]
    fn test_range_excludes_its_start_from_singles() {
        let clauses = tag_clauses("untagged ethe 1/1 to 1/4 ethe 2/7");
        let members = clauses[0].members();
        assert_eq!(
            members,
            vec![
                MembershipEntry::Range {
                    tag: TagKind::Untagged,
                    slot_low: 1,
                    slot_high: 1,
                    port_low: 1,
                    port_high: 4,
                },
                single(TagKind::Untagged, "ethernet 2/7"),
            ]
        );
    }

    #[test]
    fn test_category_order_is_range_single_router() {
        let clauses = tag_clauses("tagged ve 5 ethe 1/9 ethe 1/1 to 1/2");
        let members = clauses[0].members();
        assert!(matches!(members[0], MembershipEntry::Range { .. }));
        assert_eq!(members[1], single(TagKind::Tagged, "ethernet 1/9"));
        assert_eq!(
            members[2],
            MembershipEntry::RouterInterface {
                port: "5".to_string()
            }
        );
    }

    #[test]
    fn test_router_interface_clause() {
        let clauses = tag_clauses("router-interface ve 100");
        assert_eq!(clauses[0].kind, TagKind::RouterInterface);
        assert_eq!(
            clauses[0].members(),
            vec![MembershipEntry::RouterInterface {
                port: "100".to_string()
            }]
        );
    }

    #[test]
    fn test_port_ref_parse() {
        let expected = Some(PortRef::Ethernet { slot: 1, port: 12 });
        assert_eq!(PortRef::parse("ethernet 1/12"), expected);
        assert_eq!(PortRef::parse("Ethernet1/12"), expected);
        assert_eq!(PortRef::parse(" e  1/12 "), expected);
        assert_eq!(
            PortRef::parse("ve 012"),
            Some(PortRef::Ve {
                port: "12".to_string()
            })
        );
        assert_eq!(PortRef::parse("lag 1"), None);
    }

    #[test]
    fn test_canonical_interface() {
        assert_eq!(canonical_interface("ethe 2/3"), "ethernet 2/3");
        assert_eq!(canonical_interface("VE 7"), "ve 7");
        assert_eq!(canonical_interface("Loopback  1"), "loopback 1");
    }
}
