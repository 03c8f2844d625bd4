//! Readers turning device output into VLAN state.
//!
//! Every reader takes the [`ParseCache`] of the current pass. The first
//! reader to need a dump queries the source and parses it; later readers in
//! the same pass reuse the parsed VLANs.

use cli_unit_common::{CliSource, UnitResult};
use cli_vlan_types::VlanId;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, instrument};

use crate::cache::ParseCache;
use crate::model::{InterfaceVlanConfig, Vlan};
use crate::projector::project;

/// A configured VLAN
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlanSummary {
    /// VLAN ID
    pub id: VlanId,
    /// First name seen for the VLAN
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Returns the parsed output of `command`, querying `source` only if the
/// pass has not seen it yet.
pub async fn cached_vlans<'c>(
    source: &dyn CliSource,
    cache: &'c mut ParseCache,
    command: &str,
) -> UnitResult<&'c [Vlan]> {
    if !cache.contains(command) {
        let raw = source.show(command).await?;
        debug!(command, bytes = raw.len(), "Fetched VLAN dump");
        cache.get_or_parse(command, &raw);
    }
    Ok(cache.get(command).unwrap_or_default())
}

/// Reads the VLAN configuration of one interface
#[instrument(skip(source, cache))]
pub async fn read_interface_vlans(
    source: &dyn CliSource,
    cache: &mut ParseCache,
    command: &str,
    interface: &str,
) -> UnitResult<InterfaceVlanConfig> {
    let vlans = cached_vlans(source, cache, command).await?;
    Ok(project(interface, vlans))
}

/// Reads the distinct VLANs configured on the device, ascending by ID
#[instrument(skip(source, cache))]
pub async fn read_vlans(
    source: &dyn CliSource,
    cache: &mut ParseCache,
    command: &str,
) -> UnitResult<Vec<VlanSummary>> {
    let vlans = cached_vlans(source, cache, command).await?;
    Ok(summarize(vlans))
}

/// Merges repeated VLAN blocks into one summary per ID
pub fn summarize(vlans: &[Vlan]) -> Vec<VlanSummary> {
    let mut by_id: BTreeMap<VlanId, Option<String>> = BTreeMap::new();
    for vlan in vlans {
        let name = by_id.entry(vlan.id()).or_default();
        if name.is_none() {
            *name = vlan.name().map(str::to_string);
        }
    }
    by_id
        .into_iter()
        .map(|(id, name)| VlanSummary { id, name })
        .collect()
}

/// VLAN IDs of a summary list
pub fn vlan_ids(summaries: &[VlanSummary]) -> BTreeSet<VlanId> {
    summaries.iter().map(|s| s.id).collect()
}
