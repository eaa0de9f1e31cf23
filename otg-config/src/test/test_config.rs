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
use test_log::test;

use super::b2b_config;
use crate::*;

#[test]
fn device_lookup() {
    let config = b2b_config();
    assert_eq!(config.device_index("tx").unwrap(), 0);
    assert_eq!(config.device_index("rx").unwrap(), 1);
    assert_eq!(config.device("rx").unwrap().name, "rx");
    assert!(matches!(
        config.device("nope"),
        Err(ConfigError::DeviceNotFound(n)) if n == "nope"
    ));
}

#[test]
fn device_pair_mut() {
    let mut config = b2b_config();
    {
        let (rx, tx) = config.device_pair_mut(1, 0).unwrap();
        assert_eq!(rx.name, "rx");
        assert_eq!(tx.name, "tx");
        rx.ethernets[0].mtu = Some(9000);
        tx.ethernets[0].mtu = Some(1500);
    }
    assert_eq!(config.devices[0].ethernets[0].mtu, Some(1500));
    assert_eq!(config.devices[1].ethernets[0].mtu, Some(9000));
    assert!(matches!(
        config.device_pair_mut(1, 1),
        Err(ConfigError::SameDevice(n)) if n == "rx"
    ));
}

#[test]
fn emulated_and_simulated_ethernets() {
    let config = b2b_config();
    let tx = config.device("tx").unwrap();
    assert!(tx.is_emulated());
    assert_eq!(tx.ethernet("tx.eth").unwrap().port_name(), Some("port1"));
    assert_eq!(tx.ethernet("tx.eth").unwrap().remote_simulated_link(), None);

    let sim = super::sim_pair();
    let a = sim.device("a").unwrap();
    assert!(!a.is_emulated());
    assert!(a.ethernets[0].is_simulated());
    assert_eq!(a.ethernets[0].remote_simulated_link(), Some("b.eth"));
}

#[test]
fn lsp_id() {
    let config = b2b_config();
    let isis = config.device("tx").unwrap().isis.as_ref().unwrap();
    assert_eq!(isis.lsp_id(), "640000000001-0-0");
    assert_eq!(isis.v4_route(0).unwrap().first_address(), Some("100.1.1.1"));
    assert_eq!(isis.v4_route(1), None);
    assert_eq!(isis.v6_route(0), None);
}

#[test]
fn isis_mut() {
    let mut config = b2b_config();
    assert!(config.device_mut("rx").unwrap().isis_mut().is_none());
    config
        .device_mut("tx")
        .unwrap()
        .isis_mut()
        .unwrap()
        .add_v6_route(IsisRouteRange::new("tx.routes6"))
        .add_address(RouteAddress::new("2001:db8::", 64, 1));
    let isis = config.device("tx").unwrap().isis.as_ref().unwrap();
    assert_eq!(isis.v6_route(0).unwrap().name, "tx.routes6");
    config.validate().unwrap();
}

#[test]
fn file_roundtrip() {
    let config = b2b_config();
    let dir = tempfile::tempdir().unwrap();
    for file in ["config.json", "config.yaml", "config.yml"] {
        let path = dir.path().join(file);
        config.write_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }
}

#[test]
fn unknown_file_format() {
    let config = b2b_config();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    assert!(matches!(
        config.write_file(&path),
        Err(ConfigError::UnknownFormat(_))
    ));
    assert!(matches!(
        Config::from_file(&path),
        Err(ConfigError::UnknownFormat(_))
    ));
    assert_eq!(
        ConfigFormat::from_path("a/b.yml").unwrap(),
        ConfigFormat::Yaml
    );
}
