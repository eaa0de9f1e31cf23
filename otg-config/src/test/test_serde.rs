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

use pretty_assertions::assert_eq;
use serde_json::json;
use test_log::test;

use super::{b2b_config, sim_pair};
use crate::*;

#[test]
fn port_connection_json() {
    let eth = DeviceEthernet::new("e", "02:00:01:01:01:01").with_port("port1");
    assert_eq!(
        serde_json::to_value(&eth).unwrap(),
        json!({
            "name": "e",
            "mac": "02:00:01:01:01:01",
            "connection": {"choice": "port_name", "port_name": "port1"}
        })
    );
}

#[test]
fn simulated_link_json() {
    let config = sim_pair();
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        json!({
            "devices": [
                {
                    "name": "a",
                    "ethernets": [{
                        "name": "a.eth",
                        "mac": "00:00:dd:ee:01:02",
                        "connection": {
                            "choice": "simulated_link",
                            "simulated_link": {"remote_simulated_link": "b.eth"}
                        }
                    }]
                },
                {
                    "name": "b",
                    "ethernets": [{
                        "name": "b.eth",
                        "mac": "00:00:dd:ee:02:01",
                        "connection": {
                            "choice": "simulated_link",
                            "simulated_link": {"remote_simulated_link": "a.eth"}
                        }
                    }]
                }
            ]
        })
    );
}

#[test]
fn isis_json() {
    let mut isis = DeviceIsisRouter::new("r.isis", "660000000001").with_basic(IsisBasic {
        hostname: Some("r".to_string()),
        enable_wide_metric: Some(true),
        ..Default::default()
    });
    let iface = isis.add_interface(IsisInterface::new("rIsisinf1", "reth1"));
    iface.level_type = Some(IsisInterfaceLevelType::Level12);
    iface.network_type = Some(IsisInterfaceNetworkType::PointToPoint);
    iface.traffic_engineering.push(LinkStateTe::with_priority_bandwidths());
    isis.add_v4_route(IsisRouteRange::new("r.v4"))
        .origin_type(IsisRouteOriginType::Internal)
        .add_address(RouteAddress::new("30.1.1.0", 32, 1));

    let value = serde_json::to_value(&isis).unwrap();
    assert_eq!(value["basic"], json!({"hostname": "r", "enable_wide_metric": true}));
    assert_eq!(value["interfaces"][0]["level_type"], json!("level_1_2"));
    assert_eq!(value["interfaces"][0]["network_type"], json!("point_to_point"));
    assert_eq!(
        value["interfaces"][0]["traffic_engineering"][0]["priority_bandwidths"]["pb7"],
        json!(125_000_000u64)
    );
    assert_eq!(
        value["v4_routes"][0],
        json!({
            "name": "r.v4",
            "addresses": [{"address": "30.1.1.0", "prefix": 32, "count": 1}],
            "origin_type": "internal"
        })
    );
    assert!(value.get("advanced").is_none());
    assert!(value.get("v6_routes").is_none());
}

#[test]
fn flow_json() {
    let mut flow = Flow::device("f", ["a.v4"], ["b.v4"]);
    flow.enable_metrics()
        .fixed_packets(1000)
        .rate_pps(200)
        .add_header(FlowHeader::ethernet(
            Pattern::value("02:00:01:01:01:01"),
            Pattern::Auto,
        ))
        .add_header(FlowHeader::ipv4(
            Pattern::value("30.1.1.0"),
            Pattern::value("40.0.3.0"),
        ));
    assert_eq!(
        serde_json::to_value(&flow).unwrap(),
        json!({
            "name": "f",
            "tx_rx": {"choice": "device", "device": {"tx_names": ["a.v4"], "rx_names": ["b.v4"]}},
            "packet": [
                {"choice": "ethernet", "ethernet": {
                    "src": {"choice": "value", "value": "02:00:01:01:01:01"},
                    "dst": {"choice": "auto"}
                }},
                {"choice": "ipv4", "ipv4": {
                    "src": {"choice": "value", "value": "30.1.1.0"},
                    "dst": {"choice": "value", "value": "40.0.3.0"}
                }}
            ],
            "rate": {"choice": "pps", "pps": 200},
            "duration": {"choice": "fixed_packets", "fixed_packets": {"packets": 1000}},
            "metrics": {"enable": true}
        })
    );
    assert_eq!(flow.endpoints().collect::<Vec<_>>(), vec!["a.v4", "b.v4"]);
}

#[test]
fn defaults_on_deserialize() {
    let config = Config::from_json(
        r#"{"devices": [{"name": "d", "ethernets": [{"name": "e", "mac": "02:00:00:00:00:01",
            "ipv4_addresses": [{"name": "i4", "address": "1.1.1.1", "gateway": "1.1.1.2"}],
            "ipv6_addresses": [{"name": "i6", "address": "::1", "gateway": "::2"}]}]}]}"#,
    )
    .unwrap();
    let eth = &config.devices[0].ethernets[0];
    assert_eq!(eth.ipv4_addresses[0].prefix, 24);
    assert_eq!(eth.ipv6_addresses[0].prefix, 64);
    assert!(eth.connection.is_none());
    assert!(config.ports.is_empty());
    assert!(config.flows.is_empty());
}

#[test]
fn yaml_matches_json() {
    let config = b2b_config();
    let from_yaml = Config::from_yaml(&config.to_yaml().unwrap()).unwrap();
    let from_json = Config::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(from_yaml, from_json);
}
