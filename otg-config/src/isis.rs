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

//! ISIS router configuration of a device.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// ISIS router running on a device.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIsisRouter {
    /// Globally unique name of the router.
    pub name: String,
    /// 6-byte system id, written as 12 hex digits.
    pub system_id: String,
    /// Basic router parameters
    pub basic: Option<IsisBasic>,
    /// Advanced router parameters
    pub advanced: Option<IsisAdvanced>,
    /// Interfaces that run ISIS.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<IsisInterface>,
    /// IPv4 route ranges advertised by the router.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub v4_routes: Vec<IsisRouteRange>,
    /// IPv6 route ranges advertised by the router.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub v6_routes: Vec<IsisRouteRange>,
}

impl DeviceIsisRouter {
    /// Create a router without interfaces and routes.
    pub fn new(name: impl Into<String>, system_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_id: system_id.into(),
            basic: None,
            advanced: None,
            interfaces: Vec::new(),
            v4_routes: Vec::new(),
            v6_routes: Vec::new(),
        }
    }

    /// Set the basic parameters.
    pub fn with_basic(mut self, basic: IsisBasic) -> Self {
        self.basic = Some(basic);
        self
    }

    /// Set the advanced parameters.
    pub fn with_advanced(mut self, advanced: IsisAdvanced) -> Self {
        self.advanced = Some(advanced);
        self
    }

    /// Append an interface and return a mutable reference to it.
    pub fn add_interface(&mut self, iface: IsisInterface) -> &mut IsisInterface {
        self.interfaces.push(iface);
        let idx = self.interfaces.len() - 1;
        &mut self.interfaces[idx]
    }

    /// Append an IPv4 route range.
    pub fn add_v4_route(&mut self, route: IsisRouteRange) -> &mut IsisRouteRange {
        self.v4_routes.push(route);
        let idx = self.v4_routes.len() - 1;
        &mut self.v4_routes[idx]
    }

    /// Append an IPv6 route range.
    pub fn add_v6_route(&mut self, route: IsisRouteRange) -> &mut IsisRouteRange {
        self.v6_routes.push(route);
        let idx = self.v6_routes.len() - 1;
        &mut self.v6_routes[idx]
    }

    /// Get the IPv4 route range at position `idx`.
    pub fn v4_route(&self, idx: usize) -> Option<&IsisRouteRange> {
        self.v4_routes.get(idx)
    }

    /// Get the IPv6 route range at position `idx`.
    pub fn v6_route(&self, idx: usize) -> Option<&IsisRouteRange> {
        self.v6_routes.get(idx)
    }

    /// LSP id of the (non-pseudonode, first fragment) LSP originated by this router.
    pub fn lsp_id(&self) -> String {
        format!("{}-0-0", self.system_id)
    }
}

/// Basic ISIS router parameters.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisBasic {
    /// IPv4 traffic engineering router id.
    pub ipv4_te_router_id: Option<String>,
    /// Hostname advertised in the dynamic hostname TLV.
    pub hostname: Option<String>,
    /// Use wide metrics.
    pub enable_wide_metric: Option<bool>,
    /// Only keep the learned LSPs that are required for reporting.
    pub learned_lsp_filter: Option<bool>,
}

/// Advanced ISIS router parameters.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisAdvanced {
    /// Pad the hello packets to the MTU.
    pub enable_hello_padding: Option<bool>,
    /// Area addresses, written as hex strings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub area_addresses: Vec<String>,
    /// LSP refresh rate in seconds.
    pub lsp_refresh_rate: Option<u32>,
    /// LSP lifetime in seconds.
    pub lsp_lifetime: Option<u32>,
    /// Set the attached bit in L1 LSPs.
    pub enable_attached_bit: Option<bool>,
}

/// Network type of an ISIS interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsisInterfaceNetworkType {
    /// Broadcast network (with DIS election)
    Broadcast,
    /// Point-to-point network
    PointToPoint,
}

/// Level of an ISIS interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsisInterfaceLevelType {
    /// Level 1 only
    #[serde(rename = "level_1")]
    Level1,
    /// Level 2 only
    #[serde(rename = "level_2")]
    Level2,
    /// Level 1 and level 2
    #[serde(rename = "level_1_2")]
    Level12,
}

/// ISIS interface, bound to an ethernet interface of the same device.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisInterface {
    /// Globally unique name.
    pub name: String,
    /// Name of the ethernet interface.
    pub eth_name: String,
    /// Interface metric
    pub metric: Option<u32>,
    /// Network type
    pub network_type: Option<IsisInterfaceNetworkType>,
    /// Level type
    pub level_type: Option<IsisInterfaceLevelType>,
    /// Traffic engineering attributes advertised for this link.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traffic_engineering: Vec<LinkStateTe>,
    /// Advanced parameters
    pub advanced: Option<IsisInterfaceAdvanced>,
}

impl IsisInterface {
    /// Create an interface with default parameters.
    pub fn new(name: impl Into<String>, eth_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            eth_name: eth_name.into(),
            metric: None,
            network_type: None,
            level_type: None,
            traffic_engineering: Vec::new(),
            advanced: None,
        }
    }
}

/// Advanced ISIS interface parameters.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisInterfaceAdvanced {
    /// Adjust the MTU to the one of the neighbor.
    pub auto_adjust_mtu: Option<bool>,
    /// Adjust the area to the one of the neighbor.
    pub auto_adjust_area: Option<bool>,
    /// Adjust the supported protocols to the ones of the neighbor.
    pub auto_adjust_supported_protocols: Option<bool>,
}

/// Traffic engineering attributes of a link.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStateTe {
    /// TE default metric
    pub metric_level: Option<u32>,
    /// Unreserved bandwidth per priority
    pub priority_bandwidths: Option<PriorityBandwidths>,
}

impl LinkStateTe {
    /// TE attributes with the default unreserved bandwidth on each priority.
    pub fn with_priority_bandwidths() -> Self {
        Self {
            metric_level: None,
            priority_bandwidths: Some(PriorityBandwidths::default()),
        }
    }
}

/// Unreserved bandwidth (bytes per second) for each of the eight priorities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct PriorityBandwidths {
    pub pb0: u64,
    pub pb1: u64,
    pub pb2: u64,
    pub pb3: u64,
    pub pb4: u64,
    pub pb5: u64,
    pub pb6: u64,
    pub pb7: u64,
}

impl Default for PriorityBandwidths {
    fn default() -> Self {
        const BW: u64 = 125_000_000;
        Self {
            pb0: BW,
            pb1: BW,
            pb2: BW,
            pb3: BW,
            pb4: BW,
            pb5: BW,
            pb6: BW,
            pb7: BW,
        }
    }
}

/// Origin of an advertised route range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsisRouteOriginType {
    /// Internal reachability
    Internal,
    /// External reachability
    External,
}

/// Range of routes advertised by an ISIS router.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisRouteRange {
    /// Globally unique name. Flows use this name as an endpoint.
    pub name: String,
    /// Address ranges
    #[serde(default)]
    pub addresses: Vec<RouteAddress>,
    /// Metric of the advertised prefixes
    pub link_metric: Option<u32>,
    /// Origin of the prefixes
    pub origin_type: Option<IsisRouteOriginType>,
}

impl IsisRouteRange {
    /// Create an empty route range.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: Vec::new(),
            link_metric: None,
            origin_type: None,
        }
    }

    /// Set the link metric.
    pub fn link_metric(&mut self, metric: u32) -> &mut Self {
        self.link_metric = Some(metric);
        self
    }

    /// Set the origin type.
    pub fn origin_type(&mut self, origin: IsisRouteOriginType) -> &mut Self {
        self.origin_type = Some(origin);
        self
    }

    /// Add an address range.
    pub fn add_address(&mut self, address: RouteAddress) -> &mut Self {
        self.addresses.push(address);
        self
    }

    /// First address of the first address range.
    pub fn first_address(&self) -> Option<&str> {
        self.addresses.first().map(|a| a.address.as_str())
    }
}

/// A block of `count` prefixes starting at `address`, each `step` apart.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAddress {
    /// First address
    pub address: String,
    /// Prefix length
    pub prefix: Option<u8>,
    /// Number of prefixes
    pub count: Option<u32>,
    /// Increment between the prefixes
    pub step: Option<u32>,
}

impl RouteAddress {
    /// Create a new block of prefixes.
    pub fn new(address: impl Into<String>, prefix: u8, count: u32) -> Self {
        Self {
            address: address.into(),
            prefix: Some(prefix),
            count: Some(count),
            step: None,
        }
    }

    /// Set the step between two prefixes.
    pub fn with_step(mut self, step: u32) -> Self {
        self.step = Some(step);
        self
    }
}
