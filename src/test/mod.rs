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


use otg_config::{Config, DeviceEthernet, DeviceIsisRouter};

/// Configuration with a single emulated device `emu`, connected to `port1` and running ISIS.
pub(crate) fn emulated_config() -> Config {
    let mut config = Config::new();
    config.add_port("port1");
    let emu = config.add_device("emu");
    emu.add_ethernet(DeviceEthernet::new("emu.eth", "02:00:01:01:01:01").with_port("port1"));
    emu.set_isis(DeviceIsisRouter::new("emu.isis", "640000000001"));
    config
}

mod test_grid;
