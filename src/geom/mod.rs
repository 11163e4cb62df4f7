// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [CameraGeometry]: the static per-telescope pixel layout and neighbor
//! adjacency that every downstream stage (cleaning, parameterization) reads.

mod camera_geometry;
mod neighbors;

pub use camera_geometry::{CameraGeometry, CameraGeometryError, PixelShape};
