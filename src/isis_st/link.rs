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

//! Wiring of two devices with a simulated point-to-point link.

use std::net::{Ipv4Addr, Ipv6Addr};

use otg_config::{
    Config, DeviceEthernet, DeviceIpv4, DeviceIpv6, IsisInterface, LinkStateTe,
};

use super::{
    node::{ipv6, octet},
    TopologyError,
};

/// Prefix length of the IPv4 link networks.
const LINK_IPV4_PREFIX: u8 = 24;
/// Prefix length of the IPv6 link networks.
const LINK_IPV6_PREFIX: u8 = 64;

/// How to address the links of a simulated topology. At least one of both address families must
/// be set. For a link between node `a` and node `b` (numbered from 1), the two ends get:
///
/// - IPv4: `{ipv4_first_octet}.{a}.{b}.1` and `{ipv4_first_octet}.{a}.{b}.2`
/// - IPv6: `{ipv6_first_group}::{a}:{b}:1` and `{ipv6_first_group}::{a}:{b}:2`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LinkAddressing {
    /// First octet of all IPv4 link addresses.
    pub ipv4_first_octet: Option<u8>,
    /// First group of all IPv6 link addresses (written in hex).
    pub ipv6_first_group: Option<u16>,
}

impl LinkAddressing {
    /// Returns `true` if neither IPv4 nor IPv6 addressing is configured.
    pub fn is_empty(&self) -> bool {
        self.ipv4_first_octet.is_none() && self.ipv6_first_group.is_none()
    }
}

/// Description of a link created between two devices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimLink {
    /// Ethernet interface on the first device.
    pub eth_a: String,
    /// Ethernet interface on the second device.
    pub eth_b: String,
    /// IPv4 addresses of the first and second device.
    pub ipv4: Option<(Ipv4Addr, Ipv4Addr)>,
    /// IPv6 addresses of the first and second device.
    pub ipv6: Option<(Ipv6Addr, Ipv6Addr)>,
}

/// Connect the devices at position `dev_a` and `dev_b` of the configuration. `idx_a` and `idx_b`
/// are the (zero-based) indices used to derive the MAC and IP addresses of the link. Both devices
/// must run an ISIS router, and each gets a new ethernet with an ISIS interface bound to it.
///
/// The configuration is left untouched if an error is returned.
pub(super) fn make_link(
    config: &mut Config,
    dev_a: usize,
    dev_b: usize,
    idx_a: usize,
    idx_b: usize,
    addressing: LinkAddressing,
) -> Result<SimLink, TopologyError> {
    if addressing.is_empty() {
        return Err(TopologyError::NoLinkAddressing);
    }
    let a = octet(idx_a + 1)?;
    let b = octet(idx_b + 1)?;

    let (d1, d2) = config.device_pair_mut(dev_a, dev_b)?;
    for d in [&*d1, &*d2] {
        if d.isis.is_none() {
            return Err(TopologyError::NoIsisRouter(d.name.clone()));
        }
    }

    let eth1_name = format!("{}eth{}", d1.name, d1.ethernets.len() + 1);
    let eth2_name = format!("{}eth{}", d2.name, d2.ethernets.len() + 1);
    log::debug!("Connect {} to {} ({eth1_name} <-> {eth2_name})", d1.name, d2.name);

    let mut eth1 = DeviceEthernet::new(&eth1_name, format!("00:00:dd:ee:{a:02x}:{b:02x}"))
        .with_simulated_link(&eth2_name);
    let mut eth2 = DeviceEthernet::new(&eth2_name, format!("00:00:dd:ee:{b:02x}:{a:02x}"))
        .with_simulated_link(&eth1_name);

    let ipv4 = addressing.ipv4_first_octet.map(|o| {
        let ip1 = Ipv4Addr::new(o, a, b, 1);
        let ip2 = Ipv4Addr::new(o, a, b, 2);
        eth1.add_ipv4(DeviceIpv4::new(
            format!("{eth1_name}ip4"),
            ip1.to_string(),
            ip2.to_string(),
            LINK_IPV4_PREFIX,
        ));
        eth2.add_ipv4(DeviceIpv4::new(
            format!("{eth2_name}ip4"),
            ip2.to_string(),
            ip1.to_string(),
            LINK_IPV4_PREFIX,
        ));
        (ip1, ip2)
    });

    let ipv6 = match addressing.ipv6_first_group {
        Some(g) => {
            let ip1 = ipv6(format!("{g:x}::{a}:{b}:1"))?;
            let ip2 = ipv6(format!("{g:x}::{a}:{b}:2"))?;
            eth1.add_ipv6(DeviceIpv6::new(
                format!("{eth1_name}ip6"),
                ip1.to_string(),
                ip2.to_string(),
                LINK_IPV6_PREFIX,
            ));
            eth2.add_ipv6(DeviceIpv6::new(
                format!("{eth2_name}ip6"),
                ip2.to_string(),
                ip1.to_string(),
                LINK_IPV6_PREFIX,
            ));
            Some((ip1, ip2))
        }
        None => None,
    };

    for (d, eth) in [(d1, eth1), (d2, eth2)] {
        let eth_name = eth.name.clone();
        let dev_name = d.name.clone();
        d.add_ethernet(eth);
        if let Some(isis) = d.isis_mut() {
            let iface_name = format!("{dev_name}Isisinf{}", isis.interfaces.len() + 1);
            isis.add_interface(IsisInterface::new(iface_name, eth_name))
                .traffic_engineering
                .push(LinkStateTe::with_priority_bandwidths());
        }
    }

    Ok(SimLink {
        eth_a: eth1_name,
        eth_b: eth2_name,
        ipv4,
        ipv6,
    })
}
