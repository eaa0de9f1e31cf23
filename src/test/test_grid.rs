// OtgSim: Simulated ISIS topologies for Open Traffic Generator configurations
// Copyright (C) 2022-2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.


use std::net::Ipv4Addr;

use otg_config::{Config, ConfigError, DeviceEthernet};
use pretty_assertions::assert_eq;
use test_log::test;

use super::emulated_config;
use crate::{
    formatter::IndentedFormatter,
    isis_st::{GridBuilder, GridTopology, LinkAddressing, NodePosition, TopologyError},
};

/// 3x3 grid advertising one IPv4 route per router.
fn grid_3x3(config: &mut Config) -> GridTopology {
    let mut builder = GridBuilder::new();
    builder
        .rows(3)
        .cols(3)
        .system_id_first_octet(0x66)
        .link_ipv4_first_octet(20);
    builder.v4_routes().first_octet(30);
    builder.build(config).unwrap()
}

#[test]
fn names_and_system_ids() {
    let mut config = Config::new();
    let grid = grid_3x3(&mut config);
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.cols(), 3);
    assert_eq!(config.devices.len(), 9);
    for row in 0..3 {
        for col in 0..3 {
            let k = row * 3 + col + 1;
            let node = grid.device(row, col).unwrap();
            assert_eq!(node.name, format!("T66d{k}.sim.{row}.{col}"));
            assert_eq!(node.system_id, format!("66000000000{k}"));
            assert_eq!(node.position, NodePosition::Grid { row, col });
            assert_eq!(node.isis_name(), format!("{}.isis", node.name));
        }
    }
    // devices are created row-major
    assert_eq!(config.devices[5].name, "T66d6.sim.1.2");
    assert_eq!(
        grid.topology().lsp_ids()[4..6],
        ["660000000005-0-0".to_string(), "660000000006-0-0".to_string()]
    );
}

#[test]
fn isis_router_and_routes() {
    let mut config = Config::new();
    grid_3x3(&mut config);
    let isis = config
        .device("T66d6.sim.1.2")
        .unwrap()
        .isis
        .clone()
        .unwrap();
    assert_eq!(isis.name, "T66d6.sim.1.2.isis");
    assert_eq!(isis.system_id, "660000000006");
    let basic = isis.basic.unwrap();
    assert_eq!(basic.ipv4_te_router_id.as_deref(), Some("10.10.1.2"));
    assert_eq!(basic.hostname.as_deref(), Some("T66d6.sim.1.2"));
    assert_eq!(basic.enable_wide_metric, Some(true));

    assert_eq!(isis.v4_routes.len(), 1);
    assert!(isis.v6_routes.is_empty());
    let route = &isis.v4_routes[0];
    assert_eq!(route.name, "T66d6.sim.1.2.isis.isis.v4routes");
    assert_eq!(route.link_metric, Some(10));
    assert_eq!(route.first_address(), Some("30.2.3.0"));
    assert_eq!(route.addresses[0].prefix, Some(32));
    assert_eq!(route.addresses[0].count, Some(1));
}

#[test]
fn links_are_created_row_major() {
    let mut config = Config::new();
    let grid = grid_3x3(&mut config);
    let topo = grid.topology();
    assert_eq!(topo.link_count(), 12);

    let links: Vec<_> = topo.links().map(|(a, b, _)| (a, b)).collect();
    assert_eq!(
        links,
        vec![
            (0, 1),
            (0, 3),
            (1, 2),
            (1, 4),
            (2, 5),
            (3, 4),
            (3, 6),
            (4, 5),
            (4, 7),
            (5, 8),
            (6, 7),
            (7, 8),
        ]
    );

    let (_, _, first) = topo.links().next().unwrap();
    assert_eq!(first.eth_a, "T66d1.sim.0.0eth1");
    assert_eq!(first.eth_b, "T66d2.sim.0.1eth1");
    assert_eq!(
        first.ipv4,
        Some((Ipv4Addr::new(20, 1, 2, 1), Ipv4Addr::new(20, 1, 2, 2)))
    );
    assert_eq!(first.ipv6, None);
    assert_eq!(
        first.fmt(0),
        "T66d1.sim.0.0eth1 <-> T66d2.sim.0.1eth1 (20.1.2.1 <-> 20.1.2.2)"
    );

    let (_, _, down) = topo.links().nth(1).unwrap();
    assert_eq!(down.eth_a, "T66d1.sim.0.0eth2");
    assert_eq!(down.eth_b, "T66d4.sim.1.0eth1");
}

#[test]
fn link_objects_in_config() {
    let mut config = Config::new();
    grid_3x3(&mut config);

    let d1 = config.device("T66d1.sim.0.0").unwrap();
    let d2 = config.device("T66d2.sim.0.1").unwrap();
    let eth1 = d1.ethernet("T66d1.sim.0.0eth1").unwrap();
    let eth2 = d2.ethernet("T66d2.sim.0.1eth1").unwrap();
    assert_eq!(eth1.mac, "00:00:dd:ee:01:02");
    assert_eq!(eth2.mac, "00:00:dd:ee:02:01");
    assert_eq!(eth1.remote_simulated_link(), Some("T66d2.sim.0.1eth1"));
    assert_eq!(eth2.remote_simulated_link(), Some("T66d1.sim.0.0eth1"));

    let ip1 = &eth1.ipv4_addresses[0];
    assert_eq!(ip1.name, "T66d1.sim.0.0eth1ip4");
    assert_eq!(ip1.address, "20.1.2.1");
    assert_eq!(ip1.gateway, "20.1.2.2");
    assert_eq!(ip1.prefix, 24);
    let ip2 = &eth2.ipv4_addresses[0];
    assert_eq!(ip2.address, "20.1.2.2");
    assert_eq!(ip2.gateway, "20.1.2.1");

    let ifaces: Vec<_> = d1
        .isis
        .as_ref()
        .unwrap()
        .interfaces
        .iter()
        .map(|i| (i.name.as_str(), i.eth_name.as_str()))
        .collect();
    assert_eq!(
        ifaces,
        vec![
            ("T66d1.sim.0.0Isisinf1", "T66d1.sim.0.0eth1"),
            ("T66d1.sim.0.0Isisinf2", "T66d1.sim.0.0eth2"),
        ]
    );
    assert_eq!(
        d1.isis.as_ref().unwrap().interfaces[0]
            .traffic_engineering
            .len(),
        1
    );

    config.validate().unwrap();
}

#[test]
fn neighbors() {
    let mut config = Config::new();
    let grid = grid_3x3(&mut config);
    let topo = grid.topology();
    assert_eq!(topo.neighbors(0), vec![1, 3]);
    assert_eq!(topo.neighbors(4), vec![1, 3, 5, 7]);
    assert_eq!(topo.neighbors(8), vec![5, 7]);
    assert_eq!(topo.neighbors(9), Vec::<usize>::new());

    assert_eq!(topo.graph().node_count(), 9);
    assert_eq!(topo.graph().edge_count(), 12);
    assert_eq!(
        topo.addressing(),
        LinkAddressing {
            ipv4_first_octet: Some(20),
            ipv6_first_group: None,
        }
    );
}

#[test]
fn ipv6_addressing() {
    let mut config = Config::new();
    let mut builder = GridBuilder::new();
    builder
        .rows(2)
        .cols(2)
        .system_id_first_octet(0x66)
        .link_ipv6_first_group(0x2001);
    builder.v6_routes();
    let grid = builder.build(&mut config).unwrap();

    let (_, _, first) = grid.topology().links().next().unwrap();
    assert_eq!(first.ipv4, None);
    let (a, b) = first.ipv6.unwrap();
    assert_eq!(a.to_string(), "2001::1:2:1");
    assert_eq!(b.to_string(), "2001::1:2:2");

    let d1 = config.device("T66d1.sim.0.0").unwrap();
    let ip6 = &d1.ethernets[0].ipv6_addresses[0];
    assert_eq!(ip6.name, "T66d1.sim.0.0eth1ip6");
    assert_eq!(ip6.prefix, 64);
    assert!(d1.ethernets[0].ipv4_addresses.is_empty());

    let isis = d1.isis.as_ref().unwrap();
    assert!(isis.v4_routes.is_empty());
    assert_eq!(isis.v6_routes[0].name, "T66d1.sim.0.0.isis.isis.v6routes");
    assert_eq!(isis.v6_routes[0].first_address(), Some("10::1:1:0"));
    assert_eq!(isis.v6_routes[0].addresses[0].prefix, Some(64));

    config.validate().unwrap();
}

#[test]
fn connect_emulated_router() {
    let mut config = emulated_config();
    let mut builder = GridBuilder::new();
    builder
        .rows(2)
        .cols(2)
        .system_id_first_octet(0x66)
        .link_ipv4_first_octet(20);
    let mut grid = builder.build(&mut config).unwrap();

    let attachment = grid.connect(&mut config, "emu", 0, 1).unwrap().clone();
    assert_eq!(attachment.device, "emu");
    assert_eq!(attachment.node, 1);
    assert_eq!(attachment.link.eth_a, "emueth2");
    assert_eq!(attachment.link.eth_b, "T66d2.sim.0.1eth3");
    assert_eq!(
        attachment.link.ipv4,
        Some((Ipv4Addr::new(20, 5, 2, 1), Ipv4Addr::new(20, 5, 2, 2)))
    );
    assert_eq!(grid.topology().attachments(), &[attachment]);
    // attachments are not part of the simulated links
    assert_eq!(grid.topology().link_count(), 4);

    let emu = config.device("emu").unwrap();
    assert_eq!(emu.ethernets.len(), 2);
    assert_eq!(emu.ethernets[1].mac, "00:00:dd:ee:05:02");
    assert_eq!(
        emu.isis.as_ref().unwrap().interfaces[0].name,
        "emuIsisinf1"
    );

    config.validate().unwrap();
}

#[test]
fn connect_errors() {
    let mut config = emulated_config();
    config
        .add_device("plain")
        .add_ethernet(DeviceEthernet::new("plain.eth", "02:00:02:01:01:01").with_port("port1"));
    let mut builder = GridBuilder::new();
    builder
        .rows(2)
        .cols(2)
        .system_id_first_octet(0x66)
        .link_ipv4_first_octet(20);
    let mut grid = builder.build(&mut config).unwrap();
    let before = config.clone();

    assert!(matches!(
        grid.connect(&mut config, "plain", 0, 0),
        Err(TopologyError::NoIsisRouter(d)) if d == "plain"
    ));
    assert!(matches!(
        grid.connect(&mut config, "nope", 0, 0),
        Err(TopologyError::Config(ConfigError::DeviceNotFound(d))) if d == "nope"
    ));
    assert!(matches!(
        grid.connect(&mut config, "emu", 2, 0),
        Err(TopologyError::NodeNotFound(_))
    ));
    assert_eq!(config, before);
    assert!(grid.topology().attachments().is_empty());
}

#[test]
fn invalid_parameters() {
    let mut config = Config::new();
    let mut builder = GridBuilder::new();
    builder.rows(1).cols(3).system_id_first_octet(0x66);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::GridTooSmall(1, 3))
    ));

    builder.rows(3);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::NoLinkAddressing)
    ));

    builder.link_ipv4_first_octet(20).rows(16).cols(16);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::TooManyNodes(256))
    ));

    builder.rows(usize::MAX / 2 + 1).cols(2);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::TooManyNodes(usize::MAX))
    ));

    let mut builder = GridBuilder::new();
    builder.rows(2).cols(2).link_ipv4_first_octet(20);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::MissingSystemId)
    ));

    assert_eq!(config, Config::new());
}

#[test]
fn name_in_use() {
    let mut config = Config::new();
    grid_3x3(&mut config);
    let before = config.clone();

    let mut builder = GridBuilder::new();
    builder
        .rows(2)
        .cols(2)
        .system_id_first_octet(0x66)
        .link_ipv4_first_octet(21);
    assert!(matches!(
        builder.build(&mut config),
        Err(TopologyError::NameInUse(n)) if n == "T66d1.sim.0.0"
    ));
    assert_eq!(config, before);

    // a different system id octet yields different names
    builder.system_id_first_octet(0x68);
    builder.build(&mut config).unwrap();
    assert_eq!(config.devices.len(), 13);
}

#[test]
fn deterministic() {
    let mut config_a = emulated_config();
    let mut config_b = emulated_config();
    let mut a = grid_3x3(&mut config_a);
    let mut b = grid_3x3(&mut config_b);
    a.connect(&mut config_a, "emu", 1, 1).unwrap();
    b.connect(&mut config_b, "emu", 1, 1).unwrap();
    assert_eq!(config_a, config_b);
    assert_eq!(config_a.to_json().unwrap(), config_b.to_json().unwrap());
}
