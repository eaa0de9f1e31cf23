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

//! # Simulated ISIS topologies
//!
//! This module generates topologies of *simulated* ISIS routers inside an OTG configuration. A
//! simulated router only exists within the traffic generator: it is reachable through simulated
//! links, and eventually through an *emulated* router that is connected to a real test port. The
//! emulated router learns the LSPs of all simulated routers and forwards traffic towards the
//! route ranges they advertise.
//!
//! Two shapes are available: a [`GridBuilder`] creates a `rows x cols` grid, and a [`RingBuilder`]
//! a ring. Both derive all names, system ids, MAC and IP addresses from a few parameters, so that
//! the generated configuration is deterministic. After building, attach an emulated router with
//! [`GridTopology::connect`] or [`RingTopology::connect`].
//!
//! ```
//! use otg_config::{Config, DeviceIsisRouter};
//! use otgsim::isis_st::{GridBuilder, RingBuilder};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = Config::new();
//! config.add_device("emu").set_isis(DeviceIsisRouter::new("emu.isis", "640000000001"));
//!
//! let mut grid = GridBuilder::new()
//!     .rows(2)
//!     .cols(2)
//!     .system_id_first_octet(0x66)
//!     .link_ipv4_first_octet(20)
//!     .build(&mut config)?;
//! let attachment = grid.connect(&mut config, "emu", 0, 1)?;
//! assert_eq!(attachment.link.eth_a, "emueth1");
//! assert_eq!(attachment.link.eth_b, "T66d2.sim.0.1eth3");
//!
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use otg_config::ConfigError;
use thiserror::Error;

mod grid;
mod link;
mod node;
mod ring;
mod topology;

pub use grid::{GridBuilder, GridTopology};
pub use link::{LinkAddressing, SimLink};
pub use node::{V4RouteInfo, V6RouteInfo};
pub use ring::{RingBuilder, RingTopology};
pub use topology::{Attachment, NodePosition, SimGraph, SimNode, SimTopology};

/// Maximal number of simulated routers in a single topology. Router and link indices are encoded
/// in a single octet of the MAC and IP addresses, and one index is reserved for the emulated
/// router.
pub const MAX_NODES: usize = 254;

/// Error thrown while generating a topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The grid has less than two rows or columns.
    #[error("A grid needs at least two rows and two columns, got {0}x{1}")]
    GridTooSmall(usize, usize),
    /// The ring has less than two nodes.
    #[error("A ring needs at least two nodes, got {0}")]
    RingTooSmall(usize),
    /// The topology has too many nodes.
    #[error("The topology would have {0} nodes, but at most {} are supported", MAX_NODES)]
    TooManyNodes(usize),
    /// The first octet of the system id is not set.
    #[error("The first octet of the system id must be configured")]
    MissingSystemId,
    /// Neither IPv4 nor IPv6 link addresses are configured.
    #[error("Either the IPv4 or the IPv6 link addressing must be configured")]
    NoLinkAddressing,
    /// An index does not fit into the address octets.
    #[error("Index {0} exceeds the address space of the topology")]
    AddressSpaceExhausted(usize),
    /// An address could not be derived.
    #[error("Derived an invalid address: {0}")]
    InvalidAddress(String),
    /// A device that should be created already exists.
    #[error("A device named {0} already exists in the configuration")]
    NameInUse(String),
    /// A device that should be linked does not run ISIS.
    #[error("Device {0} has no ISIS router configured")]
    NoIsisRouter(String),
    /// The requested node is not part of the topology.
    #[error("Node {0} does not exist in the topology")]
    NodeNotFound(String),
    /// Error accessing the configuration.
    #[error("{0}")]
    Config(#[from] ConfigError),
}
