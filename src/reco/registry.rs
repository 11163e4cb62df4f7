// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A named factory for [GeometryReconstructor]s, built once at startup and
//! looked up by name from configuration, replacing implicit
//! static-initializer registration.

use std::collections::HashMap;

use super::{GeometryReconstructor, HillasReconstructor};

/// Build the default reconstructor registry. `"HillasReconstructor"` is the
/// only entry this crate ships; external code can extend a clone of the map
/// with its own factories before handing it to a `ShowerProcessor`.
pub fn default_registry() -> HashMap<&'static str, fn() -> Box<dyn GeometryReconstructor>> {
    let mut map: HashMap<&'static str, fn() -> Box<dyn GeometryReconstructor>> = HashMap::new();
    map.insert("HillasReconstructor", || {
        Box::new(HillasReconstructor::default())
    });
    map
}
