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

//! Error type for looking up, loading and storing configurations.

use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;

use crate::validate::ValidationError;

/// Errors raised while accessing or (de-)serializing a [`crate::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// There exists no device with the given name.
    #[error("Device {0} does not exist")]
    DeviceNotFound(String),
    /// Both ends of a pair refer to the same device.
    #[error("Cannot borrow device {0} twice")]
    SameDevice(String),
    /// The file extension does not tell us which format to use.
    #[error("Cannot determine the format of {0:?} (expected .json, .yaml or .yml)")]
    UnknownFormat(PathBuf),
    /// JSON (de-)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// YAML (de-)serialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is inconsistent.
    #[error("Invalid configuration:\n  {}", .0.iter().join("\n  "))]
    Invalid(Vec<ValidationError>),
}
