//! Text-to-model parser for `show running-config vlan` output.
//!
//! The parser is best effort: lines it does not recognize are skipped and
//! never produce an error.

use tracing::{debug, warn};

use crate::classifier::{is_block_terminator, squash, tag_clauses, vlan_header};
use crate::model::{MembershipEntry, Vlan};
use cli_vlan_types::VlanId;

/// Wrap artifact in device output: a continuation line is split off with a
/// trailing and a leading space.
pub const LINE_WRAP: &str = " \n ";

/// Undoes line wrapping so each VLAN header and its clauses can be read
/// from logical lines.
pub fn normalize(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace(LINE_WRAP, " ")
}

struct Block {
    id: VlanId,
    name: Option<String>,
    members: Vec<MembershipEntry>,
}

impl Block {
    fn finish(self) -> Vlan {
        Vlan::new(self.id, self.name, self.members)
    }
}

/// Parses a raw CLI dump into VLAN blocks, in order of appearance.
///
/// A block starts at a `vlan <id>` header and takes the tag clauses on the
/// header line and on each following line, up to the next header or a `!`
/// / `exit` line. Clauses outside a block are dropped. VLANs listed more
/// than once yield one entry per block.
pub fn parse_vlans(raw: &str) -> Vec<Vlan> {
    let normalized = normalize(raw);
    let mut vlans = Vec::new();
    let mut current: Option<Block> = None;

    for line in normalized.lines() {
        let line = squash(line);
        if line.is_empty() {
            continue;
        }

        if is_block_terminator(&line) {
            vlans.extend(current.take().map(Block::finish));
            continue;
        }

        if let Some(header) = vlan_header(&line) {
            vlans.extend(current.take().map(Block::finish));
            match header.id {
                Some(id) => {
                    current = Some(Block {
                        id,
                        name: header.name,
                        members: Vec::new(),
                    })
                }
                None => warn!(line = %line, "Ignoring VLAN block with out-of-range ID"),
            }
        }

        let clauses = tag_clauses(&line);
        match current.as_mut() {
            Some(block) => {
                for clause in &clauses {
                    block.members.extend(clause.members());
                }
            }
            None if !clauses.is_empty() => {
                debug!(line = %line, "Dropping membership outside a VLAN block");
            }
            None => {}
        }
    }
    vlans.extend(current.take().map(Block::finish));

    debug!(vlans = vlans.len(), "Parsed VLAN dump");
    vlans
}
