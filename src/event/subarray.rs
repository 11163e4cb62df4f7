// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [SubarrayDescription]: the static, read-only layout of a telescope
//! array, shared by reference across all processors once built.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::geom::CameraGeometry;

use super::TelId;

/// Optical properties of a telescope, independent of its camera.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpticsDescription {
    pub mirror_area: f64,
    pub equivalent_focal_length: f64,
    pub effective_focal_length: f64,
    pub num_mirrors: u32,
    pub optics_name: String,
}

/// The camera and optics of one telescope type.
#[derive(Clone, Debug)]
pub struct TelescopeDescription {
    pub camera_description: CameraGeometry,
    pub optics_description: OpticsDescription,
}

/// The static layout of the whole array: every telescope's description and
/// ground position, plus the array reference position.
#[derive(Clone, Debug)]
pub struct SubarrayDescription {
    pub name: String,
    pub reference_position: [f64; 3],
    pub telescopes: IndexMap<TelId, TelescopeDescription>,
    /// Ground-frame \[meters\] telescope positions, relative to
    /// `reference_position`.
    pub positions: IndexMap<TelId, [f64; 3]>,
}

impl SubarrayDescription {
    pub fn tel_ids(&self) -> impl Iterator<Item = TelId> + '_ {
        self.telescopes.keys().copied()
    }

    pub fn position(&self, tel_id: TelId) -> Option<[f64; 3]> {
        self.positions.get(&tel_id).copied()
    }

    pub fn telescope(&self, tel_id: TelId) -> Option<&TelescopeDescription> {
        self.telescopes.get(&tel_id)
    }
}
