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

#![deny(missing_docs, missing_debug_implementations)]

//! # OTG Config
//!
//! This library contains the data model of an [Open Traffic
//! Generator](https://otg.dev) configuration, restricted to the objects needed for emulating and
//! simulating ISIS routers and for describing flows between them. Every type serializes to (and
//! deserializes from) the JSON representation accepted by an OTG controller, so a [`Config`] can be
//! pushed as-is.
//!
//! ## Main Concepts
//!
//! A [`Config`] consists of [`Port`]s, [`Device`]s and [`Flow`]s. A device owns ethernet
//! interfaces ([`DeviceEthernet`]) that are either connected to a test port, or to another ethernet
//! through a *simulated link*. Devices can run an ISIS router ([`DeviceIsisRouter`]) with interfaces
//! bound to their ethernets, and advertise route ranges.
//!
//! OTG requires all object names within a configuration to be unique, and all references between
//! objects to resolve. Use [`Config::validate`] to check a configuration before pushing it.
//!
//! ## Example usage
//!
//! ```
//! use otg_config::*;
//!
//! # fn main() -> Result<(), ConfigError> {
//! let mut config = Config::new();
//! config.add_port("port1");
//! let dev = config.add_device("atePort1");
//! dev.add_ethernet(DeviceEthernet::new("atePort1.Eth", "02:00:01:01:01:01").with_port("port1"))
//!     .add_ipv4(DeviceIpv4::new("atePort1.IPv4", "192.0.2.2", "192.0.2.1", 24));
//!
//! config.validate()?;
//! let json = config.to_json()?;
//! assert_eq!(Config::from_json(&json)?, config);
//! # Ok(())
//! # }
//! ```

mod config;
mod device;
mod error;
mod flow;
mod isis;
pub mod validate;

pub use config::{Config, ConfigFormat, Port};
pub use device::{
    Device, DeviceEthernet, DeviceIpv4, DeviceIpv6, EthernetConnection, SimulatedLink,
};
pub use error::ConfigError;
pub use flow::{
    EthernetHeader, FixedPackets, Flow, FlowDevice, FlowDuration, FlowHeader, FlowMetrics,
    FlowPort, FlowRate, FlowTxRx, IpHeader, Pattern,
};
pub use isis::{
    DeviceIsisRouter, IsisAdvanced, IsisBasic, IsisInterface, IsisInterfaceAdvanced,
    IsisInterfaceLevelType, IsisInterfaceNetworkType, IsisRouteOriginType, IsisRouteRange,
    LinkStateTe, PriorityBandwidths, RouteAddress,
};
pub use validate::{ObjectKind, ValidationError};

#[cfg(test)]
mod test;
