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


//! Export generated configurations to files.

use std::path::{Path, PathBuf};

use otg_config::{Config, ConfigError};
use thiserror::Error;
use time::{format_description, OffsetDateTime};

/// Error thrown while exporting a configuration.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The configuration is invalid or cannot be written.
    #[error("{0}")]
    Config(#[from] ConfigError),
    /// The timestamp cannot be formatted.
    #[error("Cannot format the timestamp: {0}")]
    Timestamp(String),
}

/// Current local time (or UTC if the local offset is unknown), as `YYYY-MM-DD_hh-mm-ss`.
pub fn timestamp() -> Result<String, ExportError> {
    let format = format_description::parse("[year]-[month]-[day]_[hour]-[minute]-[second]")
        .map_err(|e| ExportError::Timestamp(e.to_string()))?;
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .format(&format)
        .map_err(|e| ExportError::Timestamp(e.to_string()))
}

/// First path `{prefix}_{timestamp}.json` that does not exist yet. If the file already exists,
/// an increasing number is appended to the filename.
pub fn timestamped_path(prefix: impl AsRef<str>, timestamp: &str) -> PathBuf {
    let mut offset: Option<usize> = None;
    loop {
        let filename = if let Some(offset) = offset {
            format!("{}_{timestamp}_{offset}.json", prefix.as_ref())
        } else {
            format!("{}_{timestamp}.json", prefix.as_ref())
        };
        let file = PathBuf::from(filename);
        if !file.exists() {
            break file;
        }
        offset = Some(offset.unwrap_or_default() + 1);
    }
}

/// Validate `config` and write it to `path` (JSON or YAML, depending on the extension).
pub fn write_config(config: &Config, path: impl AsRef<Path>) -> Result<(), ExportError> {
    config.validate()?;
    config.write_file(path)?;
    Ok(())
}

/// Validate `config` and write it as JSON to `{prefix}_{timestamp}.json`. Returns the path of the
/// written file.
pub fn write_json_with_timestamp(
    config: &Config,
    prefix: impl AsRef<str>,
) -> Result<PathBuf, ExportError> {
    let path = timestamped_path(prefix, &timestamp()?);
    write_config(config, &path)?;
    Ok(path)
}
