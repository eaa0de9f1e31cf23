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

use crate::*;

/// Two emulated devices connected back-to-back over `port1` and `port2`, the first one running
/// ISIS with a single route range.
pub(crate) fn b2b_config() -> Config {
    let mut config = Config::new();
    config.add_port("port1");
    config.add_port("port2");

    let tx = config.add_device("tx");
    tx.add_ethernet(DeviceEthernet::new("tx.eth", "02:00:01:01:01:01").with_port("port1"))
        .add_ipv4(DeviceIpv4::new("tx.ip4", "192.0.2.2", "192.0.2.1", 24));
    let isis = tx.set_isis(DeviceIsisRouter::new("tx.isis", "640000000001"));
    isis.add_interface(IsisInterface::new("tx.isis.if", "tx.eth"));
    isis.add_v4_route(IsisRouteRange::new("tx.routes"))
        .link_metric(10)
        .add_address(RouteAddress::new("100.1.1.1", 32, 5).with_step(1));

    let rx = config.add_device("rx");
    rx.add_ethernet(DeviceEthernet::new("rx.eth", "02:00:02:01:01:01").with_port("port2"))
        .add_ipv4(DeviceIpv4::new("rx.ip4", "192.0.2.1", "192.0.2.2", 24));

    config
}

/// Two simulated devices connected by a simulated link.
pub(crate) fn sim_pair() -> Config {
    let mut config = Config::new();
    config
        .add_device("a")
        .add_ethernet(DeviceEthernet::new("a.eth", "00:00:dd:ee:01:02").with_simulated_link("b.eth"));
    config
        .add_device("b")
        .add_ethernet(DeviceEthernet::new("b.eth", "00:00:dd:ee:02:01").with_simulated_link("a.eth"));
    config
}

mod test_config;
mod test_serde;
mod test_validate;
