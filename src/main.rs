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


use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use itertools::Itertools;
use otgsim::{
    export::{write_config, write_json_with_timestamp},
    formatter::IndentedFormatter,
    isis_st::{GridBuilder, LinkAddressing, RingBuilder, V4RouteInfo, V6RouteInfo},
    otg_config::Config,
    scenario::ScenarioConfig,
    verify::{check_flows, check_isis_lsps, check_isis_sessions, LossExpectation, Metrics, Tolerance},
};

/// Generate OTG configurations with simulated ISIS topologies, and check the reported metrics.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// What to do
    #[clap(subcommand)]
    command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a grid of simulated ISIS routers.
    Grid {
        /// Number of rows
        #[clap(long)]
        rows: usize,
        /// Number of columns
        #[clap(long)]
        cols: usize,
        /// Parameters shared by all topologies
        #[clap(flatten)]
        topo: TopologyArgs,
    },
    /// Generate a ring of simulated ISIS routers.
    Ring {
        /// Number of routers
        #[clap(long)]
        nodes: usize,
        /// Parameters shared by all topologies
        #[clap(flatten)]
        topo: TopologyArgs,
    },
    /// Generate the back-to-back scenario with a grid behind the first port and a ring behind the
    /// second one.
    Scenario {
        /// TOML file with the scenario parameters. Uses the default scenario if omitted.
        #[clap(long, short)]
        config: Option<PathBuf>,
        /// Write the configuration to this file (`.json`, `.yaml` or `.yml`).
        #[clap(long, short, conflicts_with = "output_prefix")]
        output: Option<PathBuf>,
        /// Write the configuration to `{PREFIX}_{TIMESTAMP}.json`.
        #[clap(long)]
        output_prefix: Option<String>,
    },
    /// Check a configuration file and print all violations.
    Validate {
        /// Configuration file (`.json`, `.yaml` or `.yml`).
        file: PathBuf,
    },
    /// Check the packet loss of all flows of a configuration. Flows without metrics fail.
    VerifyFlows {
        /// Configuration file (`.json`, `.yaml` or `.yml`).
        #[clap(long, short)]
        config: PathBuf,
        /// JSON file containing the flow metrics.
        #[clap(long, short)]
        metrics: PathBuf,
        /// Expect all packets to be dropped.
        #[clap(long)]
        expect_loss: bool,
        /// Tolerated deviation from the expected loss, in percent.
        #[clap(long, default_value_t = 2.0)]
        tolerance: f64,
    },
    /// Check that all emulated ISIS routers of a configuration have established their sessions,
    /// and that they have learned the expected LSPs.
    VerifyIsis {
        /// Configuration file (`.json`, `.yaml` or `.yml`).
        #[clap(long, short)]
        config: PathBuf,
        /// JSON file containing the ISIS metrics.
        #[clap(long, short)]
        metrics: PathBuf,
        /// Expected number of established sessions per level.
        #[clap(long, default_value_t = 1)]
        sessions: u64,
        /// LSP id that every emulated ISIS router must have learned. Can be repeated.
        #[clap(long = "expected-lsp")]
        expected_lsps: Vec<String>,
    },
}

/// Parameters of the grid and ring subcommands.
#[derive(Debug, Args)]
struct TopologyArgs {
    /// First octet of the system ids, in hex.
    #[clap(long = "system-id", value_parser = parse_hex_u8)]
    system_id: u8,
    /// First octet of the IPv4 link addresses.
    #[clap(long)]
    link_ipv4: Option<u8>,
    /// First group of the IPv6 link addresses, in hex.
    #[clap(long, value_parser = parse_hex_u16)]
    link_ipv6: Option<u16>,
    /// Advertise IPv4 routes, starting with this octet.
    #[clap(long)]
    v4_routes: Option<u8>,
    /// Advertise IPv6 routes, starting with this group (in hex).
    #[clap(long, value_parser = parse_hex_u16)]
    v6_routes: Option<u16>,
    /// Prefix length of the advertised IPv4 routes.
    #[clap(long, default_value_t = 32)]
    route_prefix_len: u8,
    /// Number of routes advertised by each router.
    #[clap(long, default_value_t = 1)]
    route_count: u32,
    /// Write the configuration to this file (`.json`, `.yaml` or `.yml`) instead of stdout.
    #[clap(long, short)]
    output: Option<PathBuf>,
}

impl TopologyArgs {
    /// Link addressing
    fn link(&self) -> LinkAddressing {
        LinkAddressing {
            ipv4_first_octet: self.link_ipv4,
            ipv6_first_group: self.link_ipv6,
        }
    }

    /// IPv4 route info
    fn v4_routes(&self) -> Option<V4RouteInfo> {
        self.v4_routes.map(|first_octet| V4RouteInfo {
            first_octet,
            prefix: self.route_prefix_len,
            count: self.route_count,
        })
    }

    /// IPv6 route info
    fn v6_routes(&self) -> Option<V6RouteInfo> {
        self.v6_routes.map(|first_group| V6RouteInfo {
            first_group,
            count: self.route_count,
            ..Default::default()
        })
    }
}

/// Parse a hex number into a byte.
fn parse_hex_u8(s: &str) -> Result<u8, String> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

/// Parse a hex number into a 16-bit group.
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    u16::from_str_radix(s.trim_start_matches("0x"), 16).map_err(|e| e.to_string())
}

/// Validate the configuration and write it to `output`, or print it as JSON.
fn emit(config: &Config, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => write_config(config, path)?,
        None => {
            config.validate()?;
            println!("{}", config.to_json()?);
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_timed();

    let args = Cli::parse();

    match args.command {
        Command::Grid { rows, cols, topo } => {
            let mut config = Config::new();
            let grid = GridBuilder {
                rows,
                cols,
                system_id_first_octet: Some(topo.system_id),
                link: topo.link(),
                v4_routes: topo.v4_routes(),
                v6_routes: topo.v6_routes(),
            }
            .build(&mut config)?;
            log::debug!("Generated topology:\n{}", grid.fmt(0));
            emit(&config, topo.output)?;
        }
        Command::Ring { nodes, topo } => {
            let mut config = Config::new();
            let ring = RingBuilder {
                nodes,
                system_id_first_octet: Some(topo.system_id),
                link: topo.link(),
                v4_routes: topo.v4_routes(),
                v6_routes: topo.v6_routes(),
            }
            .build(&mut config)?;
            log::debug!("Generated topology:\n{}", ring.fmt(0));
            emit(&config, topo.output)?;
        }
        Command::Scenario {
            config,
            output,
            output_prefix,
        } => {
            let params = match config {
                Some(path) => ScenarioConfig::from_file(path)?,
                None => ScenarioConfig::default(),
            };
            let scenario = params.build()?;
            log::debug!(
                "Generated topologies:\n{}\n{}",
                scenario.grid.fmt(0),
                scenario.ring.fmt(0)
            );
            log::info!(
                "Expected LSP ids: {}",
                scenario.expected_lsp_ids.iter().join(", ")
            );
            match output_prefix {
                Some(prefix) => {
                    let path = write_json_with_timestamp(&scenario.config, prefix)?;
                    println!("{}", path.display());
                }
                None => emit(&scenario.config, output)?,
            }
        }
        Command::Validate { file } => {
            let config = Config::from_file(&file)?;
            let violations = config.violations();
            if violations.is_empty() {
                println!("{} is valid", file.display());
            } else {
                for v in violations.iter() {
                    println!("{v}");
                }
                return Err(
                    format!("{} has {} violations", file.display(), violations.len()).into(),
                );
            }
        }
        Command::VerifyFlows {
            config,
            metrics,
            expect_loss,
            tolerance,
        } => {
            let config = Config::from_file(config)?;
            let metrics = Metrics::from_file(metrics)?;
            let expectation = if expect_loss {
                LossExpectation::FullLoss
            } else {
                LossExpectation::NoLoss
            };
            let tolerance = Tolerance {
                pct: tolerance,
                ..Default::default()
            };
            let violations = check_flows(&config, &metrics, expectation, tolerance);
            for v in violations.iter() {
                println!("{v}");
            }
            if !violations.is_empty() {
                return Err(format!("{} flows failed", violations.len()).into());
            }
            println!("All {} flows passed", config.flows.len());
        }
        Command::VerifyIsis {
            config,
            metrics,
            sessions,
            expected_lsps,
        } => {
            let config = Config::from_file(config)?;
            let metrics = Metrics::from_file(metrics)?;
            let mut violations = check_isis_sessions(&config, &metrics, sessions);
            if !expected_lsps.is_empty() {
                violations.extend(check_isis_lsps(&config, &metrics, &expected_lsps));
            }
            for v in violations.iter() {
                println!("{v}");
            }
            if !violations.is_empty() {
                return Err(format!("{} ISIS checks failed", violations.len()).into());
            }
        }
    }

    Ok(())
}
