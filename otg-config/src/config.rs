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

//! The root configuration object, lookups and (de-)serialization.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::{device::Device, error::ConfigError, flow::Flow};

/// Root object of an OTG configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Test ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    /// Emulated and simulated devices
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub devices: Vec<Device>,
    /// Traffic flows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flows: Vec<Flow>,
}

/// A test port of the traffic generator.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    /// Globally unique name of the port.
    pub name: String,
    /// Location of the port, resolved by the test harness when absent.
    pub location: Option<String>,
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl ConfigFormat {
    /// Determine the format from the file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnknownFormat(path.to_path_buf())),
        }
    }
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a port without location.
    pub fn add_port(&mut self, name: impl Into<String>) -> &mut Port {
        self.ports.push(Port {
            name: name.into(),
            location: None,
        });
        let idx = self.ports.len() - 1;
        &mut self.ports[idx]
    }

    /// Add a new device without any interface and return a mutable reference to it.
    pub fn add_device(&mut self, name: impl Into<String>) -> &mut Device {
        self.devices.push(Device::new(name));
        let idx = self.devices.len() - 1;
        &mut self.devices[idx]
    }

    /// Add a flow and return a mutable reference to it.
    pub fn add_flow(&mut self, flow: Flow) -> &mut Flow {
        self.flows.push(flow);
        let idx = self.flows.len() - 1;
        &mut self.flows[idx]
    }

    /// Get the position of a device in [`Config::devices`].
    pub fn device_index(&self, name: &str) -> Result<usize, ConfigError> {
        self.devices
            .iter()
            .position(|d| d.name == name)
            .ok_or_else(|| ConfigError::DeviceNotFound(name.to_string()))
    }

    /// Get a device by its name.
    pub fn device(&self, name: &str) -> Result<&Device, ConfigError> {
        let idx = self.device_index(name)?;
        Ok(&self.devices[idx])
    }

    /// Get a device by its name mutably.
    pub fn device_mut(&mut self, name: &str) -> Result<&mut Device, ConfigError> {
        let idx = self.device_index(name)?;
        Ok(&mut self.devices[idx])
    }

    /// Get two distinct devices mutably, referenced by their position in [`Config::devices`].
    ///
    /// **Panics** if any of the indices is out of bounds.
    pub fn device_pair_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> Result<(&mut Device, &mut Device), ConfigError> {
        if a == b {
            return Err(ConfigError::SameDevice(self.devices[a].name.clone()));
        }
        if a < b {
            let (head, tail) = self.devices.split_at_mut(b);
            Ok((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.devices.split_at_mut(a);
            Ok((&mut tail[0], &mut head[b]))
        }
    }

    /// Get a flow by its name.
    pub fn flow(&self, name: &str) -> Option<&Flow> {
        self.flows.iter().find(|f| f.name == name)
    }

    /// Parse a configuration from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Serialize the configuration as a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Serialize the configuration as a YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Read a configuration from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = fs::read_to_string(path)?;
        log::debug!("Parsing {} as {:?}", path.display(), format);
        match format {
            ConfigFormat::Json => Self::from_json(&content),
            ConfigFormat::Yaml => Self::from_yaml(&content),
        }
    }

    /// Write the configuration to a `.json`, `.yaml` or `.yml` file, overwriting any existing file.
    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => self.to_json()?,
            ConfigFormat::Yaml => self.to_yaml()?,
        };
        fs::write(path, content)?;
        log::info!("Configuration written to {}", path.display());
        Ok(())
    }
}
