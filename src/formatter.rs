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


//! Formatting things.

use itertools::Itertools;

use crate::isis_st::{Attachment, GridTopology, RingTopology, SimLink, SimTopology};

/// Trait to format things using appropriate indentation.
pub trait IndentedFormatter {
    /// Format something using some specific indent.
    fn fmt(&self, indent: usize) -> String;
}

impl IndentedFormatter for SimLink {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        let mut addrs = Vec::new();
        if let Some((a, b)) = self.ipv4 {
            addrs.push(format!("{a} <-> {b}"));
        }
        if let Some((a, b)) = self.ipv6 {
            addrs.push(format!("{a} <-> {b}"));
        }
        format!(
            "{tab}{} <-> {} ({})",
            self.eth_a,
            self.eth_b,
            addrs.into_iter().join(", ")
        )
    }
}

impl IndentedFormatter for Attachment {
    fn fmt(&self, indent: usize) -> String {
        format!(
            "{}{} -> node {}\n{}",
            " ".repeat(indent),
            self.device,
            self.node,
            self.link.fmt(indent + 2)
        )
    }
}

impl IndentedFormatter for SimTopology {
    fn fmt(&self, indent: usize) -> String {
        let tab: String = " ".repeat(indent);
        let nodes = self
            .nodes()
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{tab}  {i}: {} (system id {})", n.name, n.system_id))
            .join("\n");
        let links = self
            .links()
            .map(|(a, b, link)| format!("{tab}  {a} -- {b}:\n{}", link.fmt(indent + 4)))
            .join("\n");
        let attachments = self
            .attachments()
            .iter()
            .map(|a| a.fmt(indent + 2))
            .join("\n");
        format!("{tab}nodes:\n{nodes}\n{tab}links:\n{links}\n{tab}attachments:\n{attachments}")
    }
}

impl IndentedFormatter for GridTopology {
    fn fmt(&self, indent: usize) -> String {
        format!(
            "{}grid {}x{}:\n{}",
            " ".repeat(indent),
            self.rows(),
            self.cols(),
            self.topology().fmt(indent + 2)
        )
    }
}

impl IndentedFormatter for RingTopology {
    fn fmt(&self, indent: usize) -> String {
        format!(
            "{}ring of {}:\n{}",
            " ".repeat(indent),
            self.topology().len(),
            self.topology().fmt(indent + 2)
        )
    }
}
