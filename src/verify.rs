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


//! # Verification of the collected metrics
//!
//! Once the configuration is pushed and traffic was sent, the traffic generator reports flow and
//! ISIS metrics. This module parses the JSON metrics response and checks it against the expected
//! outcome: how many packets got lost, whether the emulated ISIS routers have established their
//! sessions, and whether they have learned the LSPs of the simulated routers.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use otg_config::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error thrown while reading metrics.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The metrics cannot be parsed.
    #[error("Cannot parse the metrics: {0}")]
    Json(#[from] serde_json::Error),
    /// The metrics file cannot be read.
    #[error("Cannot read {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
}

/// Counters of a single flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMetric {
    /// Name of the flow
    pub name: String,
    /// Transmitted frames
    #[serde(default)]
    pub frames_tx: u64,
    /// Received frames
    #[serde(default)]
    pub frames_rx: u64,
}

/// Session counters of an ISIS router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisMetric {
    /// Name of the ISIS router
    pub name: String,
    /// Established level 1 sessions
    #[serde(default)]
    pub l1_sessions_up: u64,
    /// Established level 2 sessions
    #[serde(default)]
    pub l2_sessions_up: u64,
    /// Level 1 session flaps
    #[serde(default, alias = "l1_session_flap")]
    pub l1_sessions_flap: u64,
    /// Level 2 session flaps
    #[serde(default, alias = "l2_session_flap")]
    pub l2_sessions_flap: u64,
}

/// LSPs learned by an ISIS router.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsisLspState {
    /// Name of the ISIS router
    pub name: String,
    /// Ids of the learned LSPs
    #[serde(default)]
    pub lsp_ids: Vec<String>,
}

/// Metrics response of the traffic generator. Only the flow and ISIS metrics, and the learned
/// ISIS LSPs are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Flow metrics
    #[serde(default)]
    pub flow_metrics: Vec<FlowMetric>,
    /// ISIS metrics
    #[serde(default)]
    pub isis_metrics: Vec<IsisMetric>,
    /// LSPs learned by each ISIS router
    #[serde(default)]
    pub isis_lsps: Vec<IsisLspState>,
}

impl Metrics {
    /// Parse a metrics response.
    pub fn from_json(s: &str) -> Result<Self, VerifyError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Read a metrics response from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifyError> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .map_err(|e| VerifyError::Io(path.to_path_buf(), e))?;
        Self::from_json(&s)
    }

    /// Metrics of the ISIS router `name`.
    pub fn isis(&self, name: &str) -> Option<&IsisMetric> {
        self.isis_metrics.iter().find(|m| m.name == name)
    }

    /// LSPs learned by the ISIS router `name`.
    pub fn lsps(&self, name: &str) -> Option<&IsisLspState> {
        self.isis_lsps.iter().find(|m| m.name == name)
    }
}

/// Expected outcome of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LossExpectation {
    /// All packets must arrive.
    #[default]
    NoLoss,
    /// No packet may arrive.
    FullLoss,
}

/// Tolerance when checking the packet loss of a flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Tolerated deviation from the expected loss, in percent.
    pub pct: f64,
    /// Number of lost packets above which a warning is logged.
    pub packets: u64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            pct: 2.0,
            packets: 50,
        }
    }
}

/// A failed check.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Violation {
    /// A flow lost more packets than tolerated.
    #[error("Flow {flow} lost {loss_pct:.2}% of its packets, but at most {max_pct}% are tolerated")]
    ExcessiveLoss {
        /// Name of the flow
        flow: String,
        /// Measured loss in percent
        loss_pct: f64,
        /// Maximal tolerated loss
        max_pct: f64,
    },
    /// A flow that should have been dropped delivered packets.
    #[error("Flow {flow} lost only {loss_pct:.2}% of its packets, but at least {min_pct}% are expected")]
    UnexpectedDelivery {
        /// Name of the flow
        flow: String,
        /// Measured loss in percent
        loss_pct: f64,
        /// Minimal expected loss
        min_pct: f64,
    },
    /// A flow of the configuration is not reported.
    #[error("No metrics reported for flow {0}")]
    MissingFlowMetric(String),
    /// An ISIS router is not reported.
    #[error("No metrics reported for ISIS router {0}")]
    MissingIsisMetric(String),
    /// An ISIS router has not established the expected number of sessions.
    #[error("ISIS router {router} has {up} level {level} sessions up, but {expected} are expected")]
    IsisSessionsDown {
        /// Name of the ISIS router
        router: String,
        /// ISIS level (1 or 2)
        level: u8,
        /// Established sessions
        up: u64,
        /// Expected sessions
        expected: u64,
    },
    /// An ISIS router did not report its learned LSPs.
    #[error("No LSP states reported for ISIS router {0}")]
    MissingLspState(String),
    /// An LSP was not learned.
    #[error("ISIS router {router} has not learned LSP {lsp}")]
    MissingLsp {
        /// Name of the ISIS router
        router: String,
        /// The missing LSP id
        lsp: String,
    },
}

/// Check the loss of a single flow and return the loss in percent. Flows that did not transmit any
/// packet always pass with a loss of zero.
pub fn check_flow(
    metric: &FlowMetric,
    expectation: LossExpectation,
    tolerance: Tolerance,
) -> Result<f64, Violation> {
    if metric.frames_tx == 0 {
        log::warn!("Flow {} did not transmit any packet", metric.name);
        return Ok(0.0);
    }
    let tx = metric.frames_tx as f64;
    let lost = tx - metric.frames_rx as f64;
    let loss_pct = lost * 100.0 / tx;

    match expectation {
        LossExpectation::NoLoss => {
            if lost > tolerance.packets as f64 {
                log::warn!(
                    "Packets received not matching packets sent for flow {}. Sent: {}, Received: {}",
                    metric.name,
                    metric.frames_tx,
                    metric.frames_rx
                );
            }
            if loss_pct > tolerance.pct {
                return Err(Violation::ExcessiveLoss {
                    flow: metric.name.clone(),
                    loss_pct,
                    max_pct: tolerance.pct,
                });
            }
        }
        LossExpectation::FullLoss => {
            if loss_pct < 100.0 - tolerance.pct {
                return Err(Violation::UnexpectedDelivery {
                    flow: metric.name.clone(),
                    loss_pct,
                    min_pct: 100.0 - tolerance.pct,
                });
            }
        }
    }
    log::debug!("Flow {} passed with {loss_pct:.2}% loss", metric.name);
    Ok(loss_pct)
}

/// Check all flows of `config` against the reported metrics.
pub fn check_flows(
    config: &Config,
    metrics: &Metrics,
    expectation: LossExpectation,
    tolerance: Tolerance,
) -> Vec<Violation> {
    config
        .flows
        .iter()
        .filter_map(|flow| {
            match metrics.flow_metrics.iter().find(|m| m.name == flow.name) {
                Some(m) => check_flow(m, expectation, tolerance).err(),
                None => Some(Violation::MissingFlowMetric(flow.name.clone())),
            }
        })
        .collect()
}

/// Names of the ISIS routers running on emulated devices, i.e., devices that are connected to a
/// test port and not only through simulated links. Each router appears once, in device order.
pub fn emulated_isis_routers(config: &Config) -> Vec<&str> {
    config
        .devices
        .iter()
        .filter(|d| d.is_emulated())
        .filter_map(|d| d.isis.as_ref())
        .map(|isis| isis.name.as_str())
        .collect()
}

/// Check that every emulated ISIS router has `expected_up` sessions up on both levels.
pub fn check_isis_sessions(config: &Config, metrics: &Metrics, expected_up: u64) -> Vec<Violation> {
    let mut violations = Vec::new();
    for router in emulated_isis_routers(config) {
        let Some(m) = metrics.isis(router) else {
            violations.push(Violation::MissingIsisMetric(router.to_string()));
            continue;
        };
        log::debug!(
            "ISIS router {router}: L1 {} up ({} flaps), L2 {} up ({} flaps)",
            m.l1_sessions_up,
            m.l1_sessions_flap,
            m.l2_sessions_up,
            m.l2_sessions_flap
        );
        for (level, up) in [(1, m.l1_sessions_up), (2, m.l2_sessions_up)] {
            if up != expected_up {
                violations.push(Violation::IsisSessionsDown {
                    router: router.to_string(),
                    level,
                    up,
                    expected: expected_up,
                });
            }
        }
    }
    violations
}

/// Check that every expected LSP id is among the ones learned by `router`.
pub fn check_lsp_ids<'a>(
    router: &str,
    expected: impl IntoIterator<Item = &'a str>,
    learned: impl IntoIterator<Item = &'a str>,
) -> Vec<Violation> {
    let learned: HashSet<&str> = learned.into_iter().collect();
    expected
        .into_iter()
        .filter(|lsp| !learned.contains(lsp))
        .map(|lsp| Violation::MissingLsp {
            router: router.to_string(),
            lsp: lsp.to_string(),
        })
        .collect()
}

/// Check that every emulated ISIS router has learned all `expected` LSP ids.
pub fn check_isis_lsps(
    config: &Config,
    metrics: &Metrics,
    expected: &[String],
) -> Vec<Violation> {
    let mut violations = Vec::new();
    for router in emulated_isis_routers(config) {
        let Some(state) = metrics.lsps(router) else {
            violations.push(Violation::MissingLspState(router.to_string()));
            continue;
        };
        log::debug!("ISIS router {router} learned {} LSPs", state.lsp_ids.len());
        violations.extend(check_lsp_ids(
            router,
            expected.iter().map(String::as_str),
            state.lsp_ids.iter().map(String::as_str),
        ));
    }
    violations
}
