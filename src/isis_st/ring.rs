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

//! Ring of simulated ISIS routers.

use otg_config::Config;

use super::{
    node::NodeFactory, Attachment, LinkAddressing, NodePosition, SimNode, SimTopology,
    TopologyError, V4RouteInfo, V6RouteInfo, MAX_NODES,
};

/// Builder for a ring of simulated ISIS routers. Router `i` is linked to router `i + 1`, and the
/// last router is linked back to the first one. The number of nodes must be at least two.
///
/// ```
/// use otg_config::Config;
/// use otgsim::isis_st::RingBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::new();
/// let ring = RingBuilder::new()
///     .nodes(3)
///     .system_id_first_octet(0x67)
///     .link_ipv4_first_octet(30)
///     .build(&mut config)?;
/// assert_eq!(ring.topology().link_count(), 3);
/// assert_eq!(ring.device(2)?.name, "T67d3.sim.2");
/// assert_eq!(ring.device(0)?.lsp_id(), "670000000001-0-0");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingBuilder {
    /// Number of routers
    pub nodes: usize,
    /// First octet of all system ids.
    pub system_id_first_octet: Option<u8>,
    /// Addressing of the links.
    pub link: LinkAddressing,
    /// IPv4 routes advertised by each router. No IPv4 routes are advertised if `None`.
    pub v4_routes: Option<V4RouteInfo>,
    /// IPv6 routes advertised by each router. No IPv6 routes are advertised if `None`.
    pub v6_routes: Option<V6RouteInfo>,
}

impl RingBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of routers in the ring.
    pub fn nodes(&mut self, x: usize) -> &mut Self {
        self.nodes = x;
        self
    }

    /// First octet of all system ids.
    pub fn system_id_first_octet(&mut self, x: u8) -> &mut Self {
        self.system_id_first_octet = Some(x);
        self
    }

    /// First octet of all IPv4 link addresses.
    pub fn link_ipv4_first_octet(&mut self, x: u8) -> &mut Self {
        self.link.ipv4_first_octet = Some(x);
        self
    }

    /// First group of all IPv6 link addresses.
    pub fn link_ipv6_first_group(&mut self, x: u16) -> &mut Self {
        self.link.ipv6_first_group = Some(x);
        self
    }

    /// Advertise IPv4 routes from every router. This resets the route info to its default values
    /// and returns it for further modification.
    pub fn v4_routes(&mut self) -> &mut V4RouteInfo {
        self.v4_routes.insert(V4RouteInfo::default())
    }

    /// Advertise IPv6 routes from every router. This resets the route info to its default values
    /// and returns it for further modification.
    pub fn v6_routes(&mut self) -> &mut V6RouteInfo {
        self.v6_routes.insert(V6RouteInfo::default())
    }

    /// Add all routers and links of the ring to `config`. Nothing is added if the parameters are
    /// invalid.
    pub fn build(&self, config: &mut Config) -> Result<RingTopology, TopologyError> {
        if self.nodes < 2 {
            return Err(TopologyError::RingTooSmall(self.nodes));
        }
        if self.nodes > MAX_NODES {
            return Err(TopologyError::TooManyNodes(self.nodes));
        }
        let system_id_first_octet = self
            .system_id_first_octet
            .ok_or(TopologyError::MissingSystemId)?;
        if self.link.is_empty() {
            return Err(TopologyError::NoLinkAddressing);
        }

        let factory = NodeFactory {
            system_id_first_octet,
            v4_routes: self.v4_routes.as_ref(),
            v6_routes: self.v6_routes.as_ref(),
        };
        factory.check_names(
            config,
            (0..self.nodes).map(|i| (i, NodePosition::Ring(i))),
        )?;

        let mut topo = SimTopology::new(self.link);
        for idx in 0..self.nodes {
            let node = factory.create(config, idx, NodePosition::Ring(idx))?;
            topo.push_node(node);
        }
        for idx in 0..self.nodes {
            topo.link_nodes(config, idx, (idx + 1) % self.nodes)?;
        }

        log::info!("Generated a ring with {} nodes", self.nodes);
        Ok(RingTopology { topo })
    }
}

/// A generated ring of simulated routers.
#[derive(Debug, Clone)]
pub struct RingTopology {
    /// Nodes and links
    topo: SimTopology,
}

impl RingTopology {
    /// Get the simulated router with index `idx`.
    pub fn device(&self, idx: usize) -> Result<&SimNode, TopologyError> {
        self.topo.node(idx)
    }

    /// Connect the emulated router `device` to the simulated router `idx`. The emulated device
    /// must already exist in `config` and run an ISIS router.
    pub fn connect(
        &mut self,
        config: &mut Config,
        device: &str,
        idx: usize,
    ) -> Result<&Attachment, TopologyError> {
        self.topo.attach(config, device, idx)
    }

    /// Nodes and links of the ring.
    pub fn topology(&self) -> &SimTopology {
        &self.topo
    }
}
