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

//! Factory for simulated ISIS routers and the routes they advertise.

use std::net::{Ipv4Addr, Ipv6Addr};

use otg_config::{
    Config, DeviceIsisRouter, IsisBasic, IsisRouteOriginType, IsisRouteRange, RouteAddress,
};
use serde::{Deserialize, Serialize};

use super::{NodePosition, SimNode, TopologyError};

/// Metric of the route ranges advertised by simulated routers.
const ROUTE_LINK_METRIC: u32 = 10;

/// IPv4 routes advertised by every simulated router. Each router advertises a single block,
/// whose address is derived from the first octet and the position of the router:
///
/// - grid node `(row, col)`: `{first_octet}.{row + 1}.{col + 1}.0`
/// - ring node `idx`: `{first_octet}.0.{idx + 1}.0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct V4RouteInfo {
    /// First octet of the advertised addresses. The default is `10`.
    pub first_octet: u8,
    /// Prefix length of the advertised routes. The default is `32`.
    pub prefix: u8,
    /// Number of routes advertised by each router. The default is `1`.
    pub count: u32,
}

impl Default for V4RouteInfo {
    fn default() -> Self {
        Self {
            first_octet: 10,
            prefix: 32,
            count: 1,
        }
    }
}

impl V4RouteInfo {
    /// First octet of the advertised addresses. The default is `10`.
    pub fn first_octet(&mut self, x: u8) -> &mut Self {
        self.first_octet = x;
        self
    }

    /// Prefix length of the advertised routes. The default is `32`.
    pub fn prefix(&mut self, x: u8) -> &mut Self {
        self.prefix = x;
        self
    }

    /// Number of routes advertised by each router. The default is `1`.
    pub fn count(&mut self, x: u32) -> &mut Self {
        self.count = x;
        self
    }
}

/// IPv6 routes advertised by every simulated router. The first group is written in hex, and the
/// position of the router is written in decimal digits:
///
/// - grid node `(row, col)`: `{first_group}::{row + 1}:{col + 1}:0`
/// - ring node `idx`: `{first_group}::{idx + 1}:0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct V6RouteInfo {
    /// First group of the advertised addresses. The default is `0x10`.
    pub first_group: u16,
    /// Prefix length of the advertised routes. The default is `64`.
    pub prefix: u8,
    /// Number of routes advertised by each router. The default is `1`.
    pub count: u32,
}

impl Default for V6RouteInfo {
    fn default() -> Self {
        Self {
            first_group: 0x10,
            prefix: 64,
            count: 1,
        }
    }
}

impl V6RouteInfo {
    /// First group of the advertised addresses. The default is `0x10`.
    pub fn first_group(&mut self, x: u16) -> &mut Self {
        self.first_group = x;
        self
    }

    /// Prefix length of the advertised routes. The default is `64`.
    pub fn prefix(&mut self, x: u8) -> &mut Self {
        self.prefix = x;
        self
    }

    /// Number of routes advertised by each router. The default is `1`.
    pub fn count(&mut self, x: u32) -> &mut Self {
        self.count = x;
        self
    }
}

/// Parse an IPv6 address that was assembled from decimal position numbers.
pub(super) fn ipv6(s: String) -> Result<Ipv6Addr, TopologyError> {
    s.parse().map_err(|_| TopologyError::InvalidAddress(s))
}

/// Convert a position number into an address octet.
pub(super) fn octet(x: usize) -> Result<u8, TopologyError> {
    u8::try_from(x).map_err(|_| TopologyError::AddressSpaceExhausted(x))
}

/// Creates the devices of simulated routers that share the same system id prefix and route
/// settings.
#[derive(Debug, Clone, Copy)]
pub(super) struct NodeFactory<'a> {
    /// First octet of the system id, also part of the device names.
    pub system_id_first_octet: u8,
    /// IPv4 routes to advertise
    pub v4_routes: Option<&'a V4RouteInfo>,
    /// IPv6 routes to advertise
    pub v6_routes: Option<&'a V6RouteInfo>,
}

impl<'a> NodeFactory<'a> {
    /// Name of the device for node `node_idx` at `position`.
    pub fn device_name(&self, node_idx: usize, position: NodePosition) -> String {
        let s = self.system_id_first_octet;
        let k = node_idx + 1;
        match position {
            NodePosition::Grid { row, col } => format!("T{s:02x}d{k}.sim.{row}.{col}"),
            NodePosition::Ring(idx) => format!("T{s:02x}d{k}.sim.{idx}"),
        }
    }

    /// Make sure that none of the devices for the given nodes already exists in the
    /// configuration.
    pub fn check_names(
        &self,
        config: &Config,
        nodes: impl IntoIterator<Item = (usize, NodePosition)>,
    ) -> Result<(), TopologyError> {
        for (node_idx, position) in nodes {
            let name = self.device_name(node_idx, position);
            if config.device_index(&name).is_ok() {
                return Err(TopologyError::NameInUse(name));
            }
        }
        Ok(())
    }

    /// Add the device for node `node_idx` at `position` to the configuration.
    pub fn create(
        &self,
        config: &mut Config,
        node_idx: usize,
        position: NodePosition,
    ) -> Result<SimNode, TopologyError> {
        let s = self.system_id_first_octet;
        let k_octet = octet(node_idx + 1)?;

        let name = self.device_name(node_idx, position);
        if config.device_index(&name).is_ok() {
            return Err(TopologyError::NameInUse(name));
        }
        let te_router_id = match position {
            NodePosition::Grid { row, col } => Ipv4Addr::new(10, 10, octet(row)?, octet(col)?),
            NodePosition::Ring(idx) => Ipv4Addr::new(10, 10, 0, octet(idx)?),
        };
        let system_id = format!("{s:02x}00000000{k_octet:02x}");
        log::debug!("Create simulated router {name} with system id {system_id}");

        let mut isis = DeviceIsisRouter::new(format!("{name}.isis"), system_id.clone())
            .with_basic(IsisBasic {
                ipv4_te_router_id: Some(te_router_id.to_string()),
                hostname: Some(name.clone()),
                enable_wide_metric: Some(true),
                learned_lsp_filter: None,
            });

        if let Some(info) = self.v4_routes {
            let address = match position {
                NodePosition::Grid { row, col } => {
                    Ipv4Addr::new(info.first_octet, octet(row + 1)?, octet(col + 1)?, 0)
                }
                NodePosition::Ring(idx) => Ipv4Addr::new(info.first_octet, 0, octet(idx + 1)?, 0),
            };
            let route_name = format!("{}.isis.v4routes", isis.name);
            isis.add_v4_route(IsisRouteRange::new(route_name))
                .link_metric(ROUTE_LINK_METRIC)
                .origin_type(IsisRouteOriginType::Internal)
                .add_address(RouteAddress::new(
                    address.to_string(),
                    info.prefix,
                    info.count,
                ));
        }

        if let Some(info) = self.v6_routes {
            let g = info.first_group;
            let address = match position {
                NodePosition::Grid { row, col } => {
                    ipv6(format!("{g:x}::{}:{}:0", row + 1, col + 1))?
                }
                NodePosition::Ring(idx) => ipv6(format!("{g:x}::{}:0", idx + 1))?,
            };
            let route_name = format!("{}.isis.v6routes", isis.name);
            isis.add_v6_route(IsisRouteRange::new(route_name))
                .link_metric(ROUTE_LINK_METRIC)
                .origin_type(IsisRouteOriginType::Internal)
                .add_address(RouteAddress::new(
                    address.to_string(),
                    info.prefix,
                    info.count,
                ));
        }

        config.add_device(name.clone()).set_isis(isis);

        Ok(SimNode {
            name,
            system_id,
            position,
        })
    }
}
