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


//! # Back-to-back ISIS scenario
//!
//! Build the configuration of a back-to-back test with two emulated ISIS routers, each connected
//! to a test port. A grid of simulated routers sits behind the first one, and a ring behind the
//! second one. A single IPv4 flow sends traffic from a route advertised in the grid towards a route
//! advertised in the ring.
//!
//! All parameters are stored in a [`ScenarioConfig`], which can be read from a TOML file. A
//! section present in the file replaces the default of that section entirely.
//!
//! ```toml
//! [grid]
//! rows = 4
//! cols = 4
//! system_id_first_octet = 102
//! link_ipv4_first_octet = 20
//! v4_routes = { first_octet = 30, prefix = 32, count = 1 }
//! attach_to = "atePort1"
//! attach_at = [0, 1]
//! probe = [1, 1]
//! ```

use std::{
    net::Ipv4Addr,
    path::{Path, PathBuf},
};

use ipnet::Ipv4Net;
use otg_config::{
    Config, ConfigError, DeviceEthernet, DeviceIpv4, DeviceIsisRouter, Flow, FlowHeader,
    IsisAdvanced, IsisBasic, IsisInterface, IsisInterfaceAdvanced, IsisInterfaceLevelType,
    IsisInterfaceNetworkType, IsisRouteRange, LinkStateTe, Pattern, RouteAddress,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::isis_st::{
    GridBuilder, GridTopology, LinkAddressing, RingBuilder, RingTopology, TopologyError,
    V4RouteInfo, V6RouteInfo,
};

/// Error thrown while building a scenario
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// Error generating a simulated topology.
    #[error("{0}")]
    Topology(#[from] TopologyError),
    /// Error accessing the configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The scenario file cannot be read.
    #[error("Cannot read {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    /// The scenario file cannot be parsed.
    #[error("Cannot parse the scenario: {0}")]
    Toml(#[from] toml::de::Error),
    /// A simulated router used as flow endpoint does not advertise IPv4 routes.
    #[error("Simulated router {0} does not advertise any IPv4 route")]
    NoRoutes(String),
}

/// Device that is connected to a test port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortAttrs {
    /// Name of the device
    pub name: String,
    /// Name of the test port
    pub port: String,
    /// MAC address of the ethernet interface
    pub mac: String,
    /// IPv4 address and prefix length of the interface
    pub ipv4: Ipv4Net,
    /// IPv4 gateway
    pub gateway: Ipv4Addr,
}

impl PortAttrs {
    /// Name of the ethernet interface
    pub fn eth_name(&self) -> String {
        format!("{}.Eth", self.name)
    }

    /// Name of the IPv4 address object
    pub fn ipv4_name(&self) -> String {
        format!("{}.IPv4", self.name)
    }

    /// Add the port and the device with its ethernet interface to `config`.
    fn add_to(&self, config: &mut Config) {
        config.add_port(self.port.clone());
        config
            .add_device(self.name.clone())
            .add_ethernet(
                DeviceEthernet::new(self.eth_name(), self.mac.clone()).with_port(&self.port),
            )
            .add_ipv4(DeviceIpv4::new(
                self.ipv4_name(),
                self.ipv4.addr().to_string(),
                self.gateway.to_string(),
                self.ipv4.prefix_len(),
            ));
    }
}

/// ISIS router running on a device that is connected to a test port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatedIsis {
    /// Name of the ISIS router
    pub name: String,
    /// System id, as 12 hex digits
    pub system_id: String,
    /// Area address
    pub area_address: String,
    /// LSP refresh rate in seconds
    pub lsp_refresh_rate: u32,
    /// Name of the ISIS interface
    pub interface: String,
    /// Metric of the ISIS interface
    pub metric: u32,
    /// Name of the advertised IPv4 route range
    pub route_name: String,
    /// First advertised route
    pub route: Ipv4Net,
    /// Number of advertised routes
    pub route_count: u32,
}

impl EmulatedIsis {
    /// Configure the ISIS router on the device of `port`, running on its ethernet interface.
    fn add_to(&self, config: &mut Config, port: &PortAttrs) -> Result<(), ScenarioError> {
        let mut isis = DeviceIsisRouter::new(self.name.clone(), self.system_id.clone())
            .with_basic(IsisBasic {
                ipv4_te_router_id: Some(port.ipv4.addr().to_string()),
                hostname: Some(self.name.clone()),
                enable_wide_metric: Some(true),
                learned_lsp_filter: Some(true),
            })
            .with_advanced(IsisAdvanced {
                area_addresses: vec![self.area_address.clone()],
                lsp_refresh_rate: Some(self.lsp_refresh_rate),
                enable_attached_bit: Some(false),
                ..Default::default()
            });

        let iface =
            isis.add_interface(IsisInterface::new(self.interface.clone(), port.eth_name()));
        iface.network_type = Some(IsisInterfaceNetworkType::PointToPoint);
        iface.level_type = Some(IsisInterfaceLevelType::Level12);
        iface.metric = Some(self.metric);
        iface.traffic_engineering = vec![LinkStateTe::with_priority_bandwidths()];
        iface.advanced = Some(IsisInterfaceAdvanced {
            auto_adjust_mtu: Some(true),
            auto_adjust_area: Some(true),
            auto_adjust_supported_protocols: Some(true),
        });

        isis.add_v4_route(IsisRouteRange::new(self.route_name.clone()))
            .link_metric(self.metric)
            .add_address(
                RouteAddress::new(
                    self.route.addr().to_string(),
                    self.route.prefix_len(),
                    self.route_count,
                )
                .with_step(1),
            );

        config.device_mut(&port.name)?.set_isis(isis);
        Ok(())
    }
}

/// Emulated router: a device connected to a test port, running ISIS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatedRouter {
    /// Device and port
    pub port: PortAttrs,
    /// ISIS router
    pub isis: EmulatedIsis,
}

/// Simulated grid behind one of the emulated routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSection {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// First octet of the system ids
    pub system_id_first_octet: u8,
    /// First octet of the IPv4 link addresses
    pub link_ipv4_first_octet: Option<u8>,
    /// First group of the IPv6 link addresses
    pub link_ipv6_first_group: Option<u16>,
    /// Emulated device connected to the grid
    pub attach_to: String,
    /// Position `(row, col)` where the emulated device is connected
    pub attach_at: (usize, usize),
    /// Simulated router whose LSP must be learned by the emulated routers.
    pub probe: (usize, usize),
    /// IPv4 routes advertised by each simulated router
    pub v4_routes: Option<V4RouteInfo>,
    /// IPv6 routes advertised by each simulated router
    pub v6_routes: Option<V6RouteInfo>,
}

impl GridSection {
    /// Builder for the grid
    pub fn builder(&self) -> GridBuilder {
        GridBuilder {
            rows: self.rows,
            cols: self.cols,
            system_id_first_octet: Some(self.system_id_first_octet),
            link: LinkAddressing {
                ipv4_first_octet: self.link_ipv4_first_octet,
                ipv6_first_group: self.link_ipv6_first_group,
            },
            v4_routes: self.v4_routes,
            v6_routes: self.v6_routes,
        }
    }
}

/// Simulated ring behind one of the emulated routers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RingSection {
    /// Number of nodes
    pub nodes: usize,
    /// First octet of the system ids
    pub system_id_first_octet: u8,
    /// First octet of the IPv4 link addresses
    pub link_ipv4_first_octet: Option<u8>,
    /// First group of the IPv6 link addresses
    pub link_ipv6_first_group: Option<u16>,
    /// Emulated device connected to the ring
    pub attach_to: String,
    /// Index of the node where the emulated device is connected
    pub attach_at: usize,
    /// Simulated router whose LSP must be learned by the emulated routers.
    pub probe: usize,
    /// IPv4 routes advertised by each simulated router
    pub v4_routes: Option<V4RouteInfo>,
    /// IPv6 routes advertised by each simulated router
    pub v6_routes: Option<V6RouteInfo>,
}

impl RingSection {
    /// Builder for the ring
    pub fn builder(&self) -> RingBuilder {
        RingBuilder {
            nodes: self.nodes,
            system_id_first_octet: Some(self.system_id_first_octet),
            link: LinkAddressing {
                ipv4_first_octet: self.link_ipv4_first_octet,
                ipv6_first_group: self.link_ipv6_first_group,
            },
            v4_routes: self.v4_routes,
            v6_routes: self.v6_routes,
        }
    }
}

/// IPv4 flow from a simulated router of the grid to one of the ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSection {
    /// Grid position of the source
    pub from: (usize, usize),
    /// Ring index of the destination
    pub to: usize,
    /// Number of packets to send
    pub packets: u64,
    /// Packets per second
    pub pps: u64,
}

/// All parameters of the back-to-back scenario. The default values reproduce the reference
/// setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Emulated router that sends the traffic, connected to the grid.
    pub tx: EmulatedRouter,
    /// Emulated router that receives the traffic, connected to the ring.
    pub rx: EmulatedRouter,
    /// Simulated grid
    pub grid: GridSection,
    /// Simulated ring
    pub ring: RingSection,
    /// Traffic
    pub flow: FlowSection,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        let tx_port = PortAttrs {
            name: "atePort1".to_string(),
            port: "port1".to_string(),
            mac: "02:00:01:01:01:01".to_string(),
            ipv4: net(Ipv4Addr::new(192, 0, 2, 2), 24),
            gateway: Ipv4Addr::new(192, 0, 2, 1),
        };
        let rx_port = PortAttrs {
            name: "atePort2".to_string(),
            port: "port2".to_string(),
            mac: "02:00:02:01:01:01".to_string(),
            ipv4: net(Ipv4Addr::new(192, 0, 2, 1), 24),
            gateway: Ipv4Addr::new(192, 0, 2, 2),
        };
        let v4_routes = |first_octet| V4RouteInfo {
            first_octet,
            prefix: 32,
            count: 1,
        };
        Self {
            grid: GridSection {
                rows: 3,
                cols: 3,
                system_id_first_octet: 0x66,
                link_ipv4_first_octet: Some(20),
                link_ipv6_first_group: None,
                attach_to: tx_port.name.clone(),
                attach_at: (0, 1),
                probe: (1, 1),
                v4_routes: Some(v4_routes(30)),
                v6_routes: None,
            },
            ring: RingSection {
                nodes: 3,
                system_id_first_octet: 0x67,
                link_ipv4_first_octet: Some(30),
                link_ipv6_first_group: None,
                attach_to: rx_port.name.clone(),
                attach_at: 1,
                probe: 0,
                v4_routes: Some(v4_routes(40)),
                v6_routes: None,
            },
            tx: EmulatedRouter {
                port: tx_port,
                isis: EmulatedIsis {
                    name: "dtxIsis".to_string(),
                    system_id: "640000000001".to_string(),
                    area_address: "490001".to_string(),
                    lsp_refresh_rate: 900,
                    interface: "dtxIsisInt".to_string(),
                    metric: 10,
                    route_name: "dtxIsisRr4".to_string(),
                    route: net(Ipv4Addr::new(100, 1, 1, 1), 32),
                    route_count: 5,
                },
            },
            rx: EmulatedRouter {
                port: rx_port,
                isis: EmulatedIsis {
                    name: "drxIsis".to_string(),
                    system_id: "650000000001".to_string(),
                    area_address: "490001".to_string(),
                    lsp_refresh_rate: 900,
                    interface: "drxIsisInt".to_string(),
                    metric: 10,
                    route_name: "drxIsisRr4".to_string(),
                    route: net(Ipv4Addr::new(200, 1, 1, 1), 32),
                    route_count: 5,
                },
            },
            flow: FlowSection {
                from: (2, 2),
                to: 2,
                packets: 1000,
                pps: 200,
            },
        }
    }
}

/// Network `addr/prefix_len`. Falls back to a host route if the prefix length is out of range.
fn net(addr: Ipv4Addr, prefix_len: u8) -> Ipv4Net {
    Ipv4Net::new(addr, prefix_len).unwrap_or_else(|_| Ipv4Net::from(addr))
}

/// A generated scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// The complete OTG configuration
    pub config: Config,
    /// Simulated grid
    pub grid: GridTopology,
    /// Simulated ring
    pub ring: RingTopology,
    /// Name of the generated flow
    pub flow: String,
    /// LSP ids that the emulated routers must learn once ISIS has converged.
    pub expected_lsp_ids: Vec<String>,
}

impl ScenarioConfig {
    /// Parse a scenario from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(s)?)
    }

    /// Read a scenario from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| ScenarioError::Io(path.to_path_buf(), e))?;
        log::debug!("Read scenario from {}", path.display());
        Self::from_toml(&s)
    }

    /// Generate the configuration.
    pub fn build(&self) -> Result<Scenario, ScenarioError> {
        let mut config = Config::new();

        self.tx.port.add_to(&mut config);
        self.rx.port.add_to(&mut config);

        self.tx.isis.add_to(&mut config, &self.tx.port)?;
        let mut grid = self.grid.builder().build(&mut config)?;
        let (row, col) = self.grid.attach_at;
        grid.connect(&mut config, &self.grid.attach_to, row, col)?;

        self.rx.isis.add_to(&mut config, &self.rx.port)?;
        let mut ring = self.ring.builder().build(&mut config)?;
        ring.connect(&mut config, &self.ring.attach_to, self.ring.attach_at)?;

        let (row, col) = self.flow.from;
        let from = grid.device(row, col)?.name.clone();
        let to = ring.device(self.flow.to)?.name.clone();
        let (from_route, from_addr) = first_v4_route(&config, &from)?;
        let (to_route, to_addr) = first_v4_route(&config, &to)?;

        let name = format!("IPv4 {from}-> {to}");
        let mut flow = Flow::device(name.clone(), [from_route], [to_route]);
        flow.enable_metrics()
            .fixed_packets(self.flow.packets)
            .rate_pps(self.flow.pps)
            .add_header(FlowHeader::ethernet(
                Pattern::value(self.tx.port.mac.clone()),
                Pattern::Auto,
            ))
            .add_header(FlowHeader::ipv4(
                Pattern::value(from_addr),
                Pattern::value(to_addr),
            ));
        config.add_flow(flow);
        log::info!("Created flow {name}");

        let (row, col) = self.grid.probe;
        let expected_lsp_ids = vec![
            grid.device(row, col)?.lsp_id(),
            ring.device(self.ring.probe)?.lsp_id(),
        ];

        Ok(Scenario {
            config,
            grid,
            ring,
            flow: name,
            expected_lsp_ids,
        })
    }
}

/// Name and first address of the first IPv4 route range advertised by `device`.
fn first_v4_route(config: &Config, device: &str) -> Result<(String, String), ScenarioError> {
    config
        .device(device)?
        .isis
        .as_ref()
        .and_then(|isis| isis.v4_route(0))
        .and_then(|r| Some((r.name.clone(), r.first_address()?.to_string())))
        .ok_or_else(|| ScenarioError::NoRoutes(device.to_string()))
}
