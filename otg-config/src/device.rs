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

//! Devices, their ethernet interfaces and IP addresses.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::isis::DeviceIsisRouter;

/// An emulated (or simulated) device. Devices connected to a test port are *emulated*, and devices
/// that are only reachable over simulated links are *simulated*.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Globally unique name of the device.
    pub name: String,
    /// Ethernet interfaces of the device.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ethernets: Vec<DeviceEthernet>,
    /// ISIS router running on the device.
    pub isis: Option<DeviceIsisRouter>,
}

impl Device {
    /// Create a new device without any interface.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ethernets: Vec::new(),
            isis: None,
        }
    }

    /// Append an ethernet interface and return a mutable reference to it.
    pub fn add_ethernet(&mut self, eth: DeviceEthernet) -> &mut DeviceEthernet {
        self.ethernets.push(eth);
        let idx = self.ethernets.len() - 1;
        &mut self.ethernets[idx]
    }

    /// Get the ethernet interface with the given name.
    pub fn ethernet(&self, name: &str) -> Option<&DeviceEthernet> {
        self.ethernets.iter().find(|e| e.name == name)
    }

    /// Set the ISIS router of the device, replacing any existing one, and return a mutable
    /// reference to it.
    pub fn set_isis(&mut self, isis: DeviceIsisRouter) -> &mut DeviceIsisRouter {
        self.isis.insert(isis)
    }

    /// Get the ISIS router of the device mutably.
    pub fn isis_mut(&mut self) -> Option<&mut DeviceIsisRouter> {
        self.isis.as_mut()
    }

    /// Returns `true` if at least one ethernet is not attached to a simulated link, i.e., the
    /// device is reachable through a test port.
    pub fn is_emulated(&self) -> bool {
        self.ethernets.iter().any(|e| !e.is_simulated())
    }
}

/// Ethernet interface of a device.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEthernet {
    /// Globally unique name of the interface.
    pub name: String,
    /// MAC address in the form `xx:xx:xx:xx:xx:xx`.
    pub mac: String,
    /// Maximum transmission unit.
    pub mtu: Option<u16>,
    /// What the interface is connected to.
    pub connection: Option<EthernetConnection>,
    /// IPv4 addresses on this interface.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv4_addresses: Vec<DeviceIpv4>,
    /// IPv6 addresses on this interface.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6_addresses: Vec<DeviceIpv6>,
}

impl DeviceEthernet {
    /// Create an unconnected ethernet interface without any addresses.
    pub fn new(name: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mac: mac.into(),
            mtu: None,
            connection: None,
            ipv4_addresses: Vec::new(),
            ipv6_addresses: Vec::new(),
        }
    }

    /// Connect the interface to a test port.
    pub fn with_port(mut self, port_name: impl Into<String>) -> Self {
        self.connection = Some(EthernetConnection::PortName {
            port_name: port_name.into(),
        });
        self
    }

    /// Connect the interface to the ethernet `remote` of another device through a simulated link.
    pub fn with_simulated_link(mut self, remote: impl Into<String>) -> Self {
        self.connection = Some(EthernetConnection::SimulatedLink {
            simulated_link: SimulatedLink {
                remote_simulated_link: remote.into(),
            },
        });
        self
    }

    /// Add an IPv4 address.
    pub fn add_ipv4(&mut self, ip: DeviceIpv4) -> &mut Self {
        self.ipv4_addresses.push(ip);
        self
    }

    /// Add an IPv6 address.
    pub fn add_ipv6(&mut self, ip: DeviceIpv6) -> &mut Self {
        self.ipv6_addresses.push(ip);
        self
    }

    /// Returns `true` if the interface is attached to a simulated link.
    pub fn is_simulated(&self) -> bool {
        matches!(
            self.connection,
            Some(EthernetConnection::SimulatedLink { .. })
        )
    }

    /// Name of the remote ethernet if the interface is attached to a simulated link.
    pub fn remote_simulated_link(&self) -> Option<&str> {
        match &self.connection {
            Some(EthernetConnection::SimulatedLink { simulated_link }) => {
                Some(simulated_link.remote_simulated_link.as_str())
            }
            _ => None,
        }
    }

    /// Name of the port if the interface is connected to a test port.
    pub fn port_name(&self) -> Option<&str> {
        match &self.connection {
            Some(EthernetConnection::PortName { port_name }) => Some(port_name.as_str()),
            _ => None,
        }
    }
}

/// Connection of an ethernet interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum EthernetConnection {
    /// Connected to a test port
    PortName {
        /// Name of the port
        port_name: String,
    },
    /// Connected to another ethernet interface of a simulated device.
    SimulatedLink {
        /// The simulated link
        simulated_link: SimulatedLink,
    },
}

/// Point-to-point link between two ethernet interfaces that exists only inside the traffic
/// generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedLink {
    /// Name of the ethernet interface on the other end.
    pub remote_simulated_link: String,
}

fn default_ipv4_prefix() -> u8 {
    24
}

fn default_ipv6_prefix() -> u8 {
    64
}

/// IPv4 address of an ethernet interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIpv4 {
    /// Globally unique name.
    pub name: String,
    /// Address
    pub address: String,
    /// Gateway address
    pub gateway: String,
    /// Prefix length. Defaults to 24.
    #[serde(default = "default_ipv4_prefix")]
    pub prefix: u8,
}

impl DeviceIpv4 {
    /// Create a new IPv4 address object.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        gateway: impl Into<String>,
        prefix: u8,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            gateway: gateway.into(),
            prefix,
        }
    }
}

/// IPv6 address of an ethernet interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIpv6 {
    /// Globally unique name.
    pub name: String,
    /// Address
    pub address: String,
    /// Gateway address
    pub gateway: String,
    /// Prefix length. Defaults to 64.
    #[serde(default = "default_ipv6_prefix")]
    pub prefix: u8,
}

impl DeviceIpv6 {
    /// Create a new IPv6 address object.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        gateway: impl Into<String>,
        prefix: u8,
    ) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            gateway: gateway.into(),
            prefix,
        }
    }
}
