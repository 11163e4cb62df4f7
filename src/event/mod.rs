// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The event data model: the static array layout ([SubarrayDescription])
//! and the per-event payload that flows through the R0 -> DL2 levels
//! ([ArrayEvent]).

mod array_event;
mod subarray;

/// Telescope identifier, unique within a subarray.
pub type TelId = u16;

pub use array_event::{
    ArrayEvent, Dl2, Dl2Tel, ImpactParameter, Monitor, MonitorTel, Pointing, ReconstructedGeometry,
    Simulation, SimulationShower, SimulationTel, TelPointing, WaveformTel, DL1Camera,
};
pub use subarray::{OpticsDescription, SubarrayDescription, TelescopeDescription};
