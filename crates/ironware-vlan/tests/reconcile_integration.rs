//! End-to-end read and plan passes against a captured IronWare dump

use cli_unit_common::{StaticSource, UnitError};
use cli_vlan_types::{RangeToken, VlanId};
use ironware_vlan::{
    plan_interface_removal, plan_interface_vlans, read_interface_vlans, read_vlans, vlan_ids,
    InterfaceMode, ParseCache, SwitchedVlanIntent, SHOW_VLAN_CMD,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use std::io::Write;

// Running config with a wrapped line and a VLAN listed twice
const RUNNING_CONFIG: &str = "\
SSH@ICX7250-24#show running-config vlan
vlan 1 name DEFAULT-VLAN by port
 no untagged ethe 1/4
!
vlan 10 name users by port
 tagged ethe 1/1 to 1/2 ethe 2/1 \n untagged ethe 1/5
 router-interface ve 10
!
vlan 20 name voice by port
 tagged ethe 1/1 ethe 1/2
!
vlan 30 by port
 untagged ethe 1/4
!
vlan 20 by port
 untagged ethe 1/6
!
";

fn v(id: u16) -> VlanId {
    VlanId::new(id).unwrap()
}

#[tokio::test]
async fn test_pass_reads_device_once() {
    let source = StaticSource::new().with_output(SHOW_VLAN_CMD, RUNNING_CONFIG);
    let mut cache = ParseCache::new();

    let trunk = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/1")
        .await
        .unwrap();
    assert_eq!(trunk.mode, Some(InterfaceMode::Trunk));
    assert_eq!(
        trunk.trunk_vlans,
        [v(10), v(20)].into_iter().collect::<BTreeSet<_>>()
    );
    assert_eq!(trunk.native_vlan, None);
    assert_eq!(
        trunk.trunk_ranges(),
        vec![RangeToken::Single(v(10)), RangeToken::Single(v(20))]
    );

    let access = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "e 1/5")
        .await
        .unwrap();
    assert_eq!(access.mode, Some(InterfaceMode::Access));
    assert_eq!(access.access_vlan, Some(v(10)));

    let moved = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/4")
        .await
        .unwrap();
    assert_eq!(moved.access_vlan, Some(v(30)));

    let idle = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 3/1")
        .await
        .unwrap();
    assert_eq!(idle.mode, Some(InterfaceMode::Access));
    assert_eq!(idle.access_vlan, Some(VlanId::DEFAULT));

    let vlans = read_vlans(&source, &mut cache, SHOW_VLAN_CMD).await.unwrap();
    let ids: Vec<u16> = vlans.iter().map(|s| s.id.as_u16()).collect();
    assert_eq!(ids, vec![1, 10, 20, 30]);
    assert_eq!(vlans[2].name.as_deref(), Some("voice"));

    assert_eq!(source.calls(), 1);
    assert_eq!(cache.parse_count(), 1);
}

#[tokio::test]
async fn test_new_pass_reads_again() {
    let source = StaticSource::new().with_output(SHOW_VLAN_CMD, RUNNING_CONFIG);

    for _ in 0..2 {
        let mut cache = ParseCache::new();
        read_vlans(&source, &mut cache, SHOW_VLAN_CMD).await.unwrap();
    }
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_plan_from_captured_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(RUNNING_CONFIG.as_bytes()).unwrap();
    let source = StaticSource::from_file(file.path()).unwrap();
    let mut cache = ParseCache::new();

    let current = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/6")
        .await
        .unwrap();
    let known = vlan_ids(&read_vlans(&source, &mut cache, SHOW_VLAN_CMD).await.unwrap());

    let intent = SwitchedVlanIntent::trunk(vec![RangeToken::Single(v(10))], Some(v(30)));
    let plan = plan_interface_vlans("ethernet 1/6", &current, &intent, &known).unwrap();
    assert_eq!(
        plan,
        vec![
            "vlan 20\nno untagged ethernet 1/6\nexit",
            "vlan 10\ntagged ethernet 1/6\nexit",
            "vlan 30\nuntagged ethernet 1/6\nexit",
        ]
    );
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_plan_rejects_unknown_vlan() {
    let source = StaticSource::new().with_fallback(RUNNING_CONFIG);
    let mut cache = ParseCache::new();

    let current = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/2")
        .await
        .unwrap();
    let known = vlan_ids(&read_vlans(&source, &mut cache, SHOW_VLAN_CMD).await.unwrap());

    let intent = SwitchedVlanIntent::trunk(vec![RangeToken::range(v(10), v(11)).unwrap()], None);
    let err = plan_interface_vlans("ethernet 1/2", &current, &intent, &known).unwrap_err();
    match err {
        UnitError::PreconditionViolated { message } => {
            assert_eq!(
                message,
                "VLAN 11 referenced by ethernet 1/2 is not configured on the device"
            );
        }
        other => panic!("expected PreconditionViolated, got {:?}", other),
    }
}

#[tokio::test]
async fn test_removal_restores_default_vlan() {
    let source = StaticSource::new().with_output(SHOW_VLAN_CMD, RUNNING_CONFIG);
    let mut cache = ParseCache::new();

    let current = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/2")
        .await
        .unwrap();
    let plan = plan_interface_removal("ethernet 1/2", &current).unwrap();
    assert_eq!(
        plan,
        vec![
            "vlan 10\nno tagged ethernet 1/2\nexit",
            "vlan 20\nno tagged ethernet 1/2\nexit",
        ]
    );
}

#[tokio::test]
async fn test_excluded_port_returns_to_default_vlan() {
    let source = StaticSource::new().with_output(SHOW_VLAN_CMD, RUNNING_CONFIG);
    let mut cache = ParseCache::new();

    let current = read_interface_vlans(&source, &mut cache, SHOW_VLAN_CMD, "ethernet 1/4")
        .await
        .unwrap();
    assert_eq!(current.access_vlan, Some(v(30)));
    assert!(current.default_vlan_excluded);

    let expected = vec![
        "vlan 30\nno untagged ethernet 1/4\nexit",
        "vlan 1\nuntagged ethernet 1/4\nexit",
    ];
    let intent = SwitchedVlanIntent {
        mode: InterfaceMode::Access,
        access_vlan: Some(VlanId::DEFAULT),
        native_vlan: None,
        trunk_vlans: Vec::new(),
    };
    let known = vlan_ids(&read_vlans(&source, &mut cache, SHOW_VLAN_CMD).await.unwrap());
    let plan = plan_interface_vlans("ethernet 1/4", &current, &intent, &known).unwrap();
    assert_eq!(plan, expected);

    let removal = plan_interface_removal("ethernet 1/4", &current).unwrap();
    assert_eq!(removal, expected);
}
