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

//! Grid of simulated ISIS routers.

use otg_config::Config;

use super::{
    node::NodeFactory, Attachment, LinkAddressing, NodePosition, SimNode, SimTopology,
    TopologyError, V4RouteInfo, V6RouteInfo, MAX_NODES,
};

/// Builder for a grid of simulated ISIS routers. Every router is linked to its right neighbor and
/// to the router below it. The following parameters are required:
///
/// - `rows` and `cols`: at least two each.
/// - `system_id_first_octet`: first octet of the system ids, also part of the device names.
/// - at least one of `link_ipv4_first_octet` or `link_ipv6_first_group`.
///
/// ```
/// use otg_config::Config;
/// use otgsim::isis_st::GridBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::new();
/// let mut builder = GridBuilder::new();
/// builder
///     .rows(3)
///     .cols(3)
///     .system_id_first_octet(0x66)
///     .link_ipv4_first_octet(20);
/// builder.v4_routes().first_octet(30);
///
/// let grid = builder.build(&mut config)?;
/// assert_eq!(grid.topology().len(), 9);
/// assert_eq!(grid.topology().link_count(), 12);
/// assert_eq!(grid.device(1, 2)?.name, "T66d6.sim.1.2");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridBuilder {
    /// Number of rows
    pub rows: usize,
    /// Number of columns
    pub cols: usize,
    /// First octet of all system ids.
    pub system_id_first_octet: Option<u8>,
    /// Addressing of the links.
    pub link: LinkAddressing,
    /// IPv4 routes advertised by each router. No IPv4 routes are advertised if `None`.
    pub v4_routes: Option<V4RouteInfo>,
    /// IPv6 routes advertised by each router. No IPv6 routes are advertised if `None`.
    pub v6_routes: Option<V6RouteInfo>,
}

impl GridBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn rows(&mut self, x: usize) -> &mut Self {
        self.rows = x;
        self
    }

    /// Number of columns.
    pub fn cols(&mut self, x: usize) -> &mut Self {
        self.cols = x;
        self
    }

    /// First octet of all system ids. Router `k` (starting at 1, row-major) gets the system id
    /// `{x}00000000{k}` (everything in hex).
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

    /// Add all routers and links of the grid to `config`. Nothing is added if the parameters are
    /// invalid.
    pub fn build(&self, config: &mut Config) -> Result<GridTopology, TopologyError> {
        if self.rows < 2 || self.cols < 2 {
            return Err(TopologyError::GridTooSmall(self.rows, self.cols));
        }
        let num_nodes = self
            .rows
            .checked_mul(self.cols)
            .filter(|n| *n <= MAX_NODES)
            .ok_or_else(|| TopologyError::TooManyNodes(self.rows.saturating_mul(self.cols)))?;
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
            (0..num_nodes).map(|i| {
                (
                    i,
                    NodePosition::Grid {
                        row: i / self.cols,
                        col: i % self.cols,
                    },
                )
            }),
        )?;

        let mut topo = SimTopology::new(self.link);
        let mut grid = vec![vec![0; self.cols]; self.rows];

        for (row, grid_row) in grid.iter_mut().enumerate() {
            for (col, cell) in grid_row.iter_mut().enumerate() {
                let node_idx = row * self.cols + col;
                let node = factory.create(config, node_idx, NodePosition::Grid { row, col })?;
                *cell = topo.push_node(node);
            }
        }

        for row in 0..self.rows {
            for col in 0..self.cols {
                let node = grid[row][col];
                if col + 1 < self.cols {
                    topo.link_nodes(config, node, grid[row][col + 1])?;
                }
                if row + 1 < self.rows {
                    topo.link_nodes(config, node, grid[row + 1][col])?;
                }
            }
        }

        log::info!(
            "Generated a {}x{} grid with {} links",
            self.rows,
            self.cols,
            topo.link_count()
        );

        Ok(GridTopology {
            rows: self.rows,
            cols: self.cols,
            grid,
            topo,
        })
    }
}

/// A generated grid of simulated routers.
#[derive(Debug, Clone)]
pub struct GridTopology {
    /// Number of rows
    rows: usize,
    /// Number of columns
    cols: usize,
    /// Node index for each position.
    grid: Vec<Vec<usize>>,
    /// Nodes and links
    topo: SimTopology,
}

impl GridTopology {
    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Index of the node at position `(row, col)`.
    pub fn node_index(&self, row: usize, col: usize) -> Result<usize, TopologyError> {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .copied()
            .ok_or_else(|| TopologyError::NodeNotFound(format!("({row}, {col})")))
    }

    /// Get the simulated router at position `(row, col)`.
    pub fn device(&self, row: usize, col: usize) -> Result<&SimNode, TopologyError> {
        self.topo.node(self.node_index(row, col)?)
    }

    /// Connect the emulated router `device` to the simulated router at `(row, col)`. The emulated
    /// device must already exist in `config` and run an ISIS router.
    pub fn connect(
        &mut self,
        config: &mut Config,
        device: &str,
        row: usize,
        col: usize,
    ) -> Result<&Attachment, TopologyError> {
        let node = self.node_index(row, col)?;
        self.topo.attach(config, device, node)
    }

    /// Nodes and links of the grid.
    pub fn topology(&self) -> &SimTopology {
        &self.topo
    }
}
