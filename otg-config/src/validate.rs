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

//! Consistency checks performed by an OTG controller before accepting a configuration.

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    net::{Ipv4Addr, Ipv6Addr},
};

use ipnet::{Ipv4Net, Ipv6Net};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::{
    config::Config, error::ConfigError, flow::FlowTxRx, isis::RouteAddress, DeviceEthernet,
};

lazy_static! {
    static ref MAC: Regex = Regex::new(r"^[0-9a-fA-F]{2}(:[0-9a-fA-F]{2}){5}$").unwrap();
    static ref SYSTEM_ID: Regex = Regex::new(r"^[0-9a-fA-F]{12}$").unwrap();
}

/// Kind of a named configuration object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ObjectKind {
    Port,
    Device,
    Ethernet,
    Ipv4,
    Ipv6,
    IsisRouter,
    IsisInterface,
    RouteRange,
    Flow,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ObjectKind::Port => "port",
            ObjectKind::Device => "device",
            ObjectKind::Ethernet => "ethernet",
            ObjectKind::Ipv4 => "IPv4 address",
            ObjectKind::Ipv6 => "IPv6 address",
            ObjectKind::IsisRouter => "ISIS router",
            ObjectKind::IsisInterface => "ISIS interface",
            ObjectKind::RouteRange => "route range",
            ObjectKind::Flow => "flow",
        })
    }
}

/// A single violation found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
pub enum ValidationError {
    /// Two objects share the same name.
    #[error("Name {name} is used by a {first} and by a {second}")]
    DuplicateName {
        /// The name
        name: String,
        /// Kind of the object that used the name first
        first: ObjectKind,
        /// Kind of the object that used it again
        second: ObjectKind,
    },
    /// An ethernet is connected to a port that does not exist.
    #[error("Ethernet {ethernet} is connected to unknown port {port}")]
    UnknownPort {
        /// The ethernet
        ethernet: String,
        /// The missing port
        port: String,
    },
    /// A simulated link points to an ethernet that does not exist.
    #[error("Ethernet {ethernet} has a simulated link to unknown ethernet {remote}")]
    UnknownRemoteLink {
        /// The ethernet
        ethernet: String,
        /// The missing remote
        remote: String,
    },
    /// The remote end of a simulated link does not point back.
    #[error("Simulated link {ethernet} -> {remote} is not mirrored by {remote}")]
    AsymmetricLink {
        /// The ethernet
        ethernet: String,
        /// The remote ethernet
        remote: String,
    },
    /// An ISIS interface is bound to an ethernet that does not exist on its device.
    #[error("ISIS interface {interface} refers to unknown ethernet {eth_name} of device {device}")]
    UnknownIsisEthernet {
        /// The device
        device: String,
        /// The ISIS interface
        interface: String,
        /// The missing ethernet
        eth_name: String,
    },
    /// Malformed MAC address.
    #[error("Ethernet {ethernet} has an invalid MAC address {mac}")]
    InvalidMac {
        /// The ethernet
        ethernet: String,
        /// The MAC
        mac: String,
    },
    /// Malformed ISIS system id.
    #[error("ISIS router {router} has an invalid system id {system_id}")]
    InvalidSystemId {
        /// The router
        router: String,
        /// The system id
        system_id: String,
    },
    /// Two ISIS routers share the same system id.
    #[error("System id {system_id} is used by ISIS routers {first} and {second}")]
    DuplicateSystemId {
        /// The system id
        system_id: String,
        /// Router that used the system id first
        first: String,
        /// Router that used it again
        second: String,
    },
    /// Malformed IP address or prefix length.
    #[error("{name} has an invalid address {address}/{prefix}")]
    InvalidAddress {
        /// The object holding the address
        name: String,
        /// The address
        address: String,
        /// The prefix length
        prefix: u8,
    },
    /// A flow endpoint does not refer to any route range or IP address (or port).
    #[error("Flow {flow} refers to unknown endpoint {endpoint}")]
    UnknownFlowEndpoint {
        /// The flow
        flow: String,
        /// The missing endpoint
        endpoint: String,
    },
    /// A flow has no transmit or no receive endpoint.
    #[error("Flow {flow} has no transmit or receive endpoint")]
    EmptyFlowEndpoints {
        /// The flow
        flow: String,
    },
}

impl Config {
    /// Check the configuration, returning [`ConfigError::Invalid`] with every violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(violations))
        }
    }

    /// Collect all violations in the configuration.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_unique_names(self, &mut errors);
        check_connections(self, &mut errors);
        check_isis(self, &mut errors);
        check_addresses(self, &mut errors);
        check_flows(self, &mut errors);
        log::debug!("Found {} violations in the configuration", errors.len());
        errors
    }
}

/// Iterate over all named objects in the configuration.
fn named_objects(config: &Config) -> Vec<(&str, ObjectKind)> {
    let mut names = Vec::new();
    names.extend(config.ports.iter().map(|p| (p.name.as_str(), ObjectKind::Port)));
    for dev in config.devices.iter() {
        names.push((dev.name.as_str(), ObjectKind::Device));
        for eth in dev.ethernets.iter() {
            names.push((eth.name.as_str(), ObjectKind::Ethernet));
            names.extend(eth.ipv4_addresses.iter().map(|ip| (ip.name.as_str(), ObjectKind::Ipv4)));
            names.extend(eth.ipv6_addresses.iter().map(|ip| (ip.name.as_str(), ObjectKind::Ipv6)));
        }
        if let Some(isis) = dev.isis.as_ref() {
            names.push((isis.name.as_str(), ObjectKind::IsisRouter));
            names.extend(
                isis.interfaces
                    .iter()
                    .map(|i| (i.name.as_str(), ObjectKind::IsisInterface)),
            );
            names.extend(
                isis.v4_routes
                    .iter()
                    .chain(isis.v6_routes.iter())
                    .map(|r| (r.name.as_str(), ObjectKind::RouteRange)),
            );
        }
    }
    names.extend(config.flows.iter().map(|f| (f.name.as_str(), ObjectKind::Flow)));
    names
}

fn check_unique_names(config: &Config, errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<&str, ObjectKind> = HashMap::new();
    for (name, kind) in named_objects(config) {
        if let Some(first) = seen.get(name) {
            errors.push(ValidationError::DuplicateName {
                name: name.to_string(),
                first: *first,
                second: kind,
            });
        } else {
            seen.insert(name, kind);
        }
    }
}

fn check_connections(config: &Config, errors: &mut Vec<ValidationError>) {
    let ports: HashSet<&str> = config.ports.iter().map(|p| p.name.as_str()).collect();
    let ethernets: HashMap<&str, &DeviceEthernet> = config
        .devices
        .iter()
        .flat_map(|d| d.ethernets.iter())
        .map(|e| (e.name.as_str(), e))
        .collect();

    for eth in config.devices.iter().flat_map(|d| d.ethernets.iter()) {
        if !MAC.is_match(&eth.mac) {
            errors.push(ValidationError::InvalidMac {
                ethernet: eth.name.clone(),
                mac: eth.mac.clone(),
            });
        }
        if let Some(port) = eth.port_name() {
            if !ports.contains(port) {
                errors.push(ValidationError::UnknownPort {
                    ethernet: eth.name.clone(),
                    port: port.to_string(),
                });
            }
        }
        if let Some(remote) = eth.remote_simulated_link() {
            match ethernets.get(remote) {
                None => errors.push(ValidationError::UnknownRemoteLink {
                    ethernet: eth.name.clone(),
                    remote: remote.to_string(),
                }),
                Some(r) if r.remote_simulated_link() != Some(eth.name.as_str()) => {
                    errors.push(ValidationError::AsymmetricLink {
                        ethernet: eth.name.clone(),
                        remote: remote.to_string(),
                    })
                }
                Some(_) => {}
            }
        }
    }
}

fn check_isis(config: &Config, errors: &mut Vec<ValidationError>) {
    let mut system_ids: HashMap<String, &str> = HashMap::new();
    for dev in config.devices.iter() {
        let Some(isis) = dev.isis.as_ref() else {
            continue;
        };
        if !SYSTEM_ID.is_match(&isis.system_id) {
            errors.push(ValidationError::InvalidSystemId {
                router: isis.name.clone(),
                system_id: isis.system_id.clone(),
            });
        } else if let Some(first) = system_ids.get(&isis.system_id.to_lowercase()) {
            errors.push(ValidationError::DuplicateSystemId {
                system_id: isis.system_id.clone(),
                first: first.to_string(),
                second: isis.name.clone(),
            });
        } else {
            system_ids.insert(isis.system_id.to_lowercase(), isis.name.as_str());
        }
        for iface in isis.interfaces.iter() {
            if dev.ethernet(&iface.eth_name).is_none() {
                errors.push(ValidationError::UnknownIsisEthernet {
                    device: dev.name.clone(),
                    interface: iface.name.clone(),
                    eth_name: iface.eth_name.clone(),
                });
            }
        }
        for route in isis.v4_routes.iter() {
            for addr in route.addresses.iter() {
                check_route_address::<Ipv4Addr>(&route.name, addr, 32, errors);
            }
        }
        for route in isis.v6_routes.iter() {
            for addr in route.addresses.iter() {
                check_route_address::<Ipv6Addr>(&route.name, addr, 128, errors);
            }
        }
    }
}

fn check_route_address<A: std::str::FromStr>(
    name: &str,
    addr: &RouteAddress,
    max_prefix: u8,
    errors: &mut Vec<ValidationError>,
) {
    let prefix = addr.prefix.unwrap_or(max_prefix);
    if addr.address.parse::<A>().is_err() || prefix > max_prefix {
        errors.push(ValidationError::InvalidAddress {
            name: name.to_string(),
            address: addr.address.clone(),
            prefix,
        });
    }
}

fn check_addresses(config: &Config, errors: &mut Vec<ValidationError>) {
    for eth in config.devices.iter().flat_map(|d| d.ethernets.iter()) {
        for ip in eth.ipv4_addresses.iter() {
            let valid = match (ip.address.parse::<Ipv4Addr>(), ip.gateway.parse::<Ipv4Addr>()) {
                (Ok(addr), Ok(_)) => Ipv4Net::new(addr, ip.prefix).is_ok(),
                _ => false,
            };
            if !valid {
                errors.push(ValidationError::InvalidAddress {
                    name: ip.name.clone(),
                    address: ip.address.clone(),
                    prefix: ip.prefix,
                });
            }
        }
        for ip in eth.ipv6_addresses.iter() {
            let valid = match (ip.address.parse::<Ipv6Addr>(), ip.gateway.parse::<Ipv6Addr>()) {
                (Ok(addr), Ok(_)) => Ipv6Net::new(addr, ip.prefix).is_ok(),
                _ => false,
            };
            if !valid {
                errors.push(ValidationError::InvalidAddress {
                    name: ip.name.clone(),
                    address: ip.address.clone(),
                    prefix: ip.prefix,
                });
            }
        }
    }
}

fn check_flows(config: &Config, errors: &mut Vec<ValidationError>) {
    let ports: HashSet<&str> = config.ports.iter().map(|p| p.name.as_str()).collect();
    let mut device_endpoints: HashSet<&str> = HashSet::new();
    for dev in config.devices.iter() {
        for eth in dev.ethernets.iter() {
            device_endpoints.extend(eth.ipv4_addresses.iter().map(|ip| ip.name.as_str()));
            device_endpoints.extend(eth.ipv6_addresses.iter().map(|ip| ip.name.as_str()));
        }
        if let Some(isis) = dev.isis.as_ref() {
            device_endpoints.extend(
                isis.v4_routes
                    .iter()
                    .chain(isis.v6_routes.iter())
                    .map(|r| r.name.as_str()),
            );
        }
    }

    for flow in config.flows.iter() {
        let (known, empty) = match &flow.tx_rx {
            FlowTxRx::Port { port } => (&ports, port.rx_names.is_empty()),
            FlowTxRx::Device { device } => (
                &device_endpoints,
                device.tx_names.is_empty() || device.rx_names.is_empty(),
            ),
        };
        if empty {
            errors.push(ValidationError::EmptyFlowEndpoints {
                flow: flow.name.clone(),
            });
        }
        for endpoint in flow.endpoints() {
            if !known.contains(endpoint) {
                errors.push(ValidationError::UnknownFlowEndpoint {
                    flow: flow.name.clone(),
                    endpoint: endpoint.to_string(),
                });
            }
        }
    }
}
