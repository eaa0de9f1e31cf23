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

//! Shared view over a generated topology: its nodes, links and attached emulated routers.

use itertools::Itertools;
use otg_config::Config;
use petgraph::{graph::NodeIndex, visit::EdgeRef, Graph, Undirected};

use super::{link::make_link, LinkAddressing, SimLink, TopologyError};

/// Where a simulated router is placed in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodePosition {
    /// Node of a grid
    Grid {
        /// Row index (zero-based)
        row: usize,
        /// Column index (zero-based)
        col: usize,
    },
    /// Node of a ring, with its index (zero-based).
    Ring(usize),
}

/// A simulated router, as created in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimNode {
    /// Name of the device in the configuration.
    pub name: String,
    /// ISIS system id
    pub system_id: String,
    /// Position of the node in the topology.
    pub position: NodePosition,
}

impl SimNode {
    /// Name of the ISIS router on the device.
    pub fn isis_name(&self) -> String {
        format!("{}.isis", self.name)
    }

    /// LSP id of the LSP originated by this router, as learned by its peers.
    pub fn lsp_id(&self) -> String {
        format!("{}-0-0", self.system_id)
    }
}

/// An emulated router connected to a node of the topology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attachment {
    /// Device name of the emulated router.
    pub device: String,
    /// Index of the simulated node it is connected to.
    pub node: usize,
    /// The link between both.
    pub link: SimLink,
}

/// Adjacency graph of a simulated topology. The node weight is the index into
/// [`SimTopology::nodes`].
pub type SimGraph = Graph<usize, SimLink, Undirected, u32>;

/// Nodes and links of a generated topology.
#[derive(Debug, Clone)]
pub struct SimTopology {
    /// All simulated routers, in the order they were created.
    nodes: Vec<SimNode>,
    /// Adjacency graph
    graph: SimGraph,
    /// Link addressing used for all links (including attachments).
    addressing: LinkAddressing,
    /// Emulated routers connected to the topology.
    attachments: Vec<Attachment>,
}

impl SimTopology {
    /// Create an empty topology.
    pub(super) fn new(addressing: LinkAddressing) -> Self {
        Self {
            nodes: Vec::new(),
            graph: Graph::default(),
            addressing,
            attachments: Vec::new(),
        }
    }

    /// Register a newly created node.
    pub(super) fn push_node(&mut self, node: SimNode) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(node);
        self.graph.add_node(idx);
        idx
    }

    /// Create a simulated link between the nodes `a` and `b`.
    pub(super) fn link_nodes(
        &mut self,
        config: &mut Config,
        a: usize,
        b: usize,
    ) -> Result<(), TopologyError> {
        let dev_a = config.device_index(&self.node(a)?.name)?;
        let dev_b = config.device_index(&self.node(b)?.name)?;
        let link = make_link(config, dev_a, dev_b, a, b, self.addressing)?;
        self.graph
            .add_edge(NodeIndex::new(a), NodeIndex::new(b), link);
        Ok(())
    }

    /// Connect the emulated router `device` to node `node`. The emulated side uses the index
    /// `self.len()` to derive its addresses.
    pub(super) fn attach(
        &mut self,
        config: &mut Config,
        device: &str,
        node: usize,
    ) -> Result<&Attachment, TopologyError> {
        let sim_name = &self.node(node)?.name;
        let dev_emu = config.device_index(device)?;
        let dev_sim = config.device_index(sim_name)?;
        log::info!("Attach {device} to simulated router {sim_name}");
        let link = make_link(
            config,
            dev_emu,
            dev_sim,
            self.nodes.len(),
            node,
            self.addressing,
        )?;
        self.attachments.push(Attachment {
            device: device.to_string(),
            node,
            link,
        });
        Ok(&self.attachments[self.attachments.len() - 1])
    }

    /// Get a node by its index.
    pub fn node(&self, idx: usize) -> Result<&SimNode, TopologyError> {
        self.nodes
            .get(idx)
            .ok_or_else(|| TopologyError::NodeNotFound(idx.to_string()))
    }

    /// All simulated routers, in the order they were created.
    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    /// Number of simulated routers.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the topology has no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Indices of all nodes that share a link with `idx`, in increasing order and without
    /// duplicates.
    pub fn neighbors(&self, idx: usize) -> Vec<usize> {
        if idx >= self.nodes.len() {
            return Vec::new();
        }
        self.graph
            .neighbors(NodeIndex::new(idx))
            .map(|n| self.graph[n])
            .sorted()
            .dedup()
            .collect()
    }

    /// All links between simulated routers, in the order they were created, as `(a, b, link)`.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize, &SimLink)> {
        self.graph.edge_references().map(|e| {
            (
                self.graph[e.source()],
                self.graph[e.target()],
                e.weight(),
            )
        })
    }

    /// Number of links between simulated routers.
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Emulated routers connected to the topology.
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// The adjacency graph.
    pub fn graph(&self) -> &SimGraph {
        &self.graph
    }

    /// Link addressing of the topology.
    pub fn addressing(&self) -> LinkAddressing {
        self.addressing
    }

    /// LSP ids of all simulated routers.
    pub fn lsp_ids(&self) -> Vec<String> {
        self.nodes.iter().map(SimNode::lsp_id).collect()
    }
}
