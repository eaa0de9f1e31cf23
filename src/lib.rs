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


//! # OtgSim: Simulated ISIS topologies for Open Traffic Generator configurations
//!
//! Testing the ISIS implementation of a device requires a large link-state database. Instead of
//! setting up many physical routers, an [Open Traffic Generator](https://otg.dev) can *simulate*
//! routers: they exist only within the traffic generator, connected through simulated links to an
//! *emulated* router that peers with the device under test over a real test port.
//!
//! This library generates such simulated topologies as part of an OTG configuration. All names,
//! system ids and addresses are derived deterministically from a few parameters.
//!
//! ## Structure
//! The source code of this program is structured as follows:
//! - The crate [`otg_config`] contains the data model of an OTG configuration, its JSON and YAML
//!   representation, and the validation of references between objects.
//! - The module [`isis_st`] generates grids ([`isis_st::GridBuilder`]) and rings
//!   ([`isis_st::RingBuilder`]) of simulated ISIS routers, and connects emulated routers to them.
//! - The module [`scenario`] builds a complete back-to-back configuration with two emulated
//!   routers, a grid, a ring and a flow between both.
//! - The module [`verify`] checks the metrics reported by the traffic generator.
//! - The module [`export`] writes generated configurations to files.
//!
//! ## Example usage
//!
//! ```
//! use otgsim::scenario::ScenarioConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let scenario = ScenarioConfig::default().build()?;
//! scenario.config.validate()?;
//! assert_eq!(scenario.expected_lsp_ids, vec!["660000000005-0-0", "670000000001-0-0"]);
//! # Ok(())
//! # }
//! ```

#![deny(
    missing_docs,
    clippy::missing_docs_in_private_items,
    missing_debug_implementations,
    rust_2018_idioms
)]

pub mod export;
pub mod formatter;
pub mod isis_st;
pub mod scenario;
#[cfg(test)]
mod test;
pub mod verify;

pub use otg_config;
