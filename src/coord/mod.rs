// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Great-circle and nominal-frame coordinate transforms.

mod camera;
mod horizontal;
mod nominal;

pub use camera::camera_to_nominal;
pub use horizontal::HorizontalCoord;
pub use nominal::{nominal_to_sky, sky_to_nominal, NominalCoord};
