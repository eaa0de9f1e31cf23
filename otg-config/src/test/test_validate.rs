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

use std::collections::HashSet;

use maplit::hashset;
use pretty_assertions::assert_eq;
use test_log::test;

use super::{b2b_config, sim_pair};
use crate::*;

fn violations(config: &Config) -> HashSet<ValidationError> {
    config.violations().into_iter().collect()
}

#[test]
fn valid_configs() {
    b2b_config().validate().unwrap();
    sim_pair().validate().unwrap();
}

#[test]
fn duplicate_names() {
    let mut config = b2b_config();
    config.add_device("port1");
    config.add_flow(Flow::device("tx", ["tx.routes"], ["rx.ip4"]));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::DuplicateName {
                name: "port1".to_string(),
                first: ObjectKind::Port,
                second: ObjectKind::Device,
            },
            ValidationError::DuplicateName {
                name: "tx".to_string(),
                first: ObjectKind::Device,
                second: ObjectKind::Flow,
            },
        }
    );
}

#[test]
fn unknown_port() {
    let mut config = b2b_config();
    config.ports.pop();
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::UnknownPort {
                ethernet: "rx.eth".to_string(),
                port: "port2".to_string(),
            }
        }
    );
}

#[test]
fn broken_simulated_links() {
    let mut config = sim_pair();
    config
        .add_device("c")
        .add_ethernet(DeviceEthernet::new("c.eth", "00:00:dd:ee:03:01").with_simulated_link("a.eth"));
    config
        .add_device("d")
        .add_ethernet(DeviceEthernet::new("d.eth", "00:00:dd:ee:04:01").with_simulated_link("x.eth"));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::AsymmetricLink {
                ethernet: "c.eth".to_string(),
                remote: "a.eth".to_string(),
            },
            ValidationError::UnknownRemoteLink {
                ethernet: "d.eth".to_string(),
                remote: "x.eth".to_string(),
            },
        }
    );
}

#[test]
fn isis_violations() {
    let mut config = b2b_config();
    let isis = config.device_mut("tx").unwrap().isis.as_mut().unwrap();
    isis.system_id = "6400000001".to_string();
    isis.add_interface(IsisInterface::new("tx.isis.if2", "rx.eth"));
    isis.add_v6_route(IsisRouteRange::new("tx.routes6"))
        .add_address(RouteAddress::new("10::1:0", 129, 1));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::InvalidSystemId {
                router: "tx.isis".to_string(),
                system_id: "6400000001".to_string(),
            },
            ValidationError::UnknownIsisEthernet {
                device: "tx".to_string(),
                interface: "tx.isis.if2".to_string(),
                eth_name: "rx.eth".to_string(),
            },
            ValidationError::InvalidAddress {
                name: "tx.routes6".to_string(),
                address: "10::1:0".to_string(),
                prefix: 129,
            },
        }
    );
}

#[test]
fn duplicate_system_ids() {
    let mut config = b2b_config();
    config
        .device_mut("rx")
        .unwrap()
        .set_isis(DeviceIsisRouter::new("rx.isis", "640000000001"));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::DuplicateSystemId {
                system_id: "640000000001".to_string(),
                first: "tx.isis".to_string(),
                second: "rx.isis".to_string(),
            }
        }
    );

    // compared case-insensitively
    config.device_mut("tx").unwrap().isis.as_mut().unwrap().system_id = "6400000000AB".to_string();
    config.device_mut("rx").unwrap().isis.as_mut().unwrap().system_id = "6400000000ab".to_string();
    assert_eq!(violations(&config).len(), 1);
}

#[test]
fn address_violations() {
    let mut config = b2b_config();
    let eth = &mut config.device_mut("tx").unwrap().ethernets[0];
    eth.mac = "00:00:dd:ee:010:01".to_string();
    eth.add_ipv4(DeviceIpv4::new("tx.ip4.bad", "20.256.1.1", "20.1.1.2", 24))
        .add_ipv4(DeviceIpv4::new("tx.ip4.len", "20.1.1.1", "20.1.1.2", 33))
        .add_ipv6(DeviceIpv6::new("tx.ip6", "20::1:1:1", "20::1:1:2", 64));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::InvalidMac {
                ethernet: "tx.eth".to_string(),
                mac: "00:00:dd:ee:010:01".to_string(),
            },
            ValidationError::InvalidAddress {
                name: "tx.ip4.bad".to_string(),
                address: "20.256.1.1".to_string(),
                prefix: 24,
            },
            ValidationError::InvalidAddress {
                name: "tx.ip4.len".to_string(),
                address: "20.1.1.1".to_string(),
                prefix: 33,
            },
        }
    );
}

#[test]
fn flow_endpoints() {
    let mut config = b2b_config();
    config.add_flow(Flow::device("ok", ["tx.routes"], ["rx.ip4"]));
    config.add_flow(Flow::device("missing", ["tx.routes"], ["rx.routes"]));
    config.add_flow(Flow::device("empty", Vec::<&str>::new(), vec!["rx.ip4"]));
    assert_eq!(
        violations(&config),
        hashset! {
            ValidationError::UnknownFlowEndpoint {
                flow: "missing".to_string(),
                endpoint: "rx.routes".to_string(),
            },
            ValidationError::EmptyFlowEndpoints {
                flow: "empty".to_string(),
            },
        }
    );
}

#[test]
fn invalid_error_lists_all_violations() {
    let mut config = sim_pair();
    config.devices[0].ethernets[0].mac = "zz".to_string();
    config.devices[1].ethernets[0].mac = "yy".to_string();
    match config.validate() {
        Err(ConfigError::Invalid(v)) => assert_eq!(v.len(), 2),
        other => panic!("expected violations, got {other:?}"),
    }
}
