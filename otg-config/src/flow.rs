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

//! Traffic flows.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// A traffic flow between two sets of endpoints.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    /// Globally unique name of the flow.
    pub name: String,
    /// Transmit and receive endpoints
    pub tx_rx: FlowTxRx,
    /// Packet headers, from the outermost to the innermost.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packet: Vec<FlowHeader>,
    /// Transmission rate
    pub rate: Option<FlowRate>,
    /// How long to transmit
    pub duration: Option<FlowDuration>,
    /// Which metrics to collect
    pub metrics: Option<FlowMetrics>,
}

impl Flow {
    /// Create a flow between devices, sending from `tx_names` to `rx_names`. The names can refer
    /// to route ranges or to IP address objects.
    pub fn device<S: Into<String>>(
        name: impl Into<String>,
        tx_names: impl IntoIterator<Item = S>,
        rx_names: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            tx_rx: FlowTxRx::Device {
                device: FlowDevice {
                    tx_names: tx_names.into_iter().map(Into::into).collect(),
                    rx_names: rx_names.into_iter().map(Into::into).collect(),
                },
            },
            packet: Vec::new(),
            rate: None,
            duration: None,
            metrics: None,
        }
    }

    /// Enable collecting flow metrics.
    pub fn enable_metrics(&mut self) -> &mut Self {
        self.metrics = Some(FlowMetrics {
            enable: true,
            loss: None,
        });
        self
    }

    /// Send a fixed number of packets.
    pub fn fixed_packets(&mut self, packets: u64) -> &mut Self {
        self.duration = Some(FlowDuration::FixedPackets {
            fixed_packets: FixedPackets { packets, gap: None },
        });
        self
    }

    /// Send with a fixed rate of packets per second.
    pub fn rate_pps(&mut self, pps: u64) -> &mut Self {
        self.rate = Some(FlowRate::Pps { pps });
        self
    }

    /// Append a header to the packet.
    pub fn add_header(&mut self, header: FlowHeader) -> &mut Self {
        self.packet.push(header);
        self
    }

    /// Names of all transmit and receive endpoints.
    pub fn endpoints(&self) -> impl Iterator<Item = &str> {
        let (tx, rx): (Vec<&str>, Vec<&str>) = match &self.tx_rx {
            FlowTxRx::Port { port } => (
                vec![port.tx_name.as_str()],
                port.rx_names.iter().map(String::as_str).collect(),
            ),
            FlowTxRx::Device { device } => (
                device.tx_names.iter().map(String::as_str).collect(),
                device.rx_names.iter().map(String::as_str).collect(),
            ),
        };
        tx.into_iter().chain(rx)
    }
}

/// Transmit and receive endpoints of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum FlowTxRx {
    /// Raw traffic between test ports
    Port {
        /// Port endpoints
        port: FlowPort,
    },
    /// Traffic between device objects (IP addresses or route ranges)
    Device {
        /// Device endpoints
        device: FlowDevice,
    },
}

/// Port endpoints of a flow.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowPort {
    /// Transmitting port
    pub tx_name: String,
    /// Receiving ports
    #[serde(default)]
    pub rx_names: Vec<String>,
}

/// Device endpoints of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDevice {
    /// Transmitting objects
    pub tx_names: Vec<String>,
    /// Receiving objects
    pub rx_names: Vec<String>,
}

/// A packet header of the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum FlowHeader {
    /// Ethernet header
    Ethernet {
        /// Header fields
        ethernet: EthernetHeader,
    },
    /// IPv4 header
    Ipv4 {
        /// Header fields
        ipv4: IpHeader,
    },
    /// IPv6 header
    Ipv6 {
        /// Header fields
        ipv6: IpHeader,
    },
}

impl FlowHeader {
    /// Ethernet header with the given source and destination patterns.
    pub fn ethernet(src: Pattern, dst: Pattern) -> Self {
        Self::Ethernet {
            ethernet: EthernetHeader {
                src: Some(src),
                dst: Some(dst),
            },
        }
    }

    /// IPv4 header with the given source and destination patterns.
    pub fn ipv4(src: Pattern, dst: Pattern) -> Self {
        Self::Ipv4 {
            ipv4: IpHeader {
                src: Some(src),
                dst: Some(dst),
            },
        }
    }

    /// IPv6 header with the given source and destination patterns.
    pub fn ipv6(src: Pattern, dst: Pattern) -> Self {
        Self::Ipv6 {
            ipv6: IpHeader {
                src: Some(src),
                dst: Some(dst),
            },
        }
    }
}

/// Fields of an ethernet header.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetHeader {
    /// Source MAC
    pub src: Option<Pattern>,
    /// Destination MAC
    pub dst: Option<Pattern>,
}

/// Address fields of an IP header.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpHeader {
    /// Source address
    pub src: Option<Pattern>,
    /// Destination address
    pub dst: Option<Pattern>,
}

/// Value of a header field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum Pattern {
    /// Let the traffic generator fill in the value (e.g., resolved MAC addresses).
    Auto,
    /// A single fixed value
    Value {
        /// The value
        value: String,
    },
    /// A list of values used in a round-robin fashion.
    Values {
        /// The values
        values: Vec<String>,
    },
}

impl Pattern {
    /// A single fixed value.
    pub fn value(x: impl Into<String>) -> Self {
        Self::Value { value: x.into() }
    }
}

/// Transmission rate of a flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum FlowRate {
    /// Packets per second
    Pps {
        /// Rate
        pps: u64,
    },
    /// Percentage of the line rate
    Percentage {
        /// Rate
        percentage: f64,
    },
}

/// Duration of a flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum FlowDuration {
    /// Send a fixed number of packets.
    FixedPackets {
        /// Parameters
        fixed_packets: FixedPackets,
    },
}

/// Send a fixed number of packets.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedPackets {
    /// Number of packets
    pub packets: u64,
    /// Minimal gap between packets, in bytes.
    pub gap: Option<u32>,
}

/// Metrics collected for a flow.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Enable collection of metrics
    pub enable: bool,
    /// Enable loss counters
    pub loss: Option<bool>,
}
