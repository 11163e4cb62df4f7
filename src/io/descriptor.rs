// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Builds a [SyntheticEventSource] from a small JSON descriptor. Stands in
//! for reading a real instrument's event file, whose parser is an external
//! collaborator out of this crate's scope; this is the CLI's self-test
//! path.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::event::{OpticsDescription, SubarrayDescription, TelescopeDescription};
use crate::geom::CameraGeometry;

use super::source::SyntheticEventSource;

/// Parameters for a synthetic run: a line of `n_telescopes` identical
/// telescopes spaced `tel_spacing_m` apart, each with a `camera_side x
/// camera_side` square camera.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RunDescriptor {
    pub n_telescopes: usize,
    pub tel_spacing_m: f64,
    pub camera_side: usize,
    pub n_events: u64,
    pub n_samples: usize,
}

impl Default for RunDescriptor {
    fn default() -> Self {
        Self {
            n_telescopes: 2,
            tel_spacing_m: 100.0,
            camera_side: 40,
            n_events: 10,
            n_samples: 40,
        }
    }
}

fn build_subarray(descriptor: &RunDescriptor) -> SubarrayDescription {
    let mut telescopes = IndexMap::new();
    let mut positions = IndexMap::new();
    let half = (descriptor.n_telescopes.saturating_sub(1)) as f64 / 2.0;
    for i in 0..descriptor.n_telescopes {
        let tel_id = (i + 1) as u16;
        let x = (i as f64 - half) * descriptor.tel_spacing_m;
        telescopes.insert(
            tel_id,
            TelescopeDescription {
                camera_description: CameraGeometry::square_grid(descriptor.camera_side),
                optics_description: OpticsDescription {
                    mirror_area: 100.0,
                    equivalent_focal_length: 28.0,
                    effective_focal_length: 28.0,
                    num_mirrors: 1,
                    optics_name: "synthetic".to_string(),
                },
            },
        );
        positions.insert(tel_id, [x, 0.0, 0.0]);
    }
    SubarrayDescription {
        name: "synthetic".to_string(),
        reference_position: [0.0, 0.0, 0.0],
        telescopes,
        positions,
    }
}

/// Read a [RunDescriptor] from `path` and build the [SyntheticEventSource]
/// it describes.
pub fn build_event_source(path: &Path) -> std::io::Result<SyntheticEventSource> {
    let contents = std::fs::read_to_string(path)?;
    let descriptor: RunDescriptor = serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let subarray = build_subarray(&descriptor);
    Ok(SyntheticEventSource::new(subarray, descriptor.n_events, descriptor.n_samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let descriptor: RunDescriptor = serde_json::from_str("{}").unwrap();
        assert_eq!(descriptor.n_telescopes, 2);
        assert_eq!(descriptor.n_events, 10);
    }

    #[test]
    fn builds_source_from_descriptor_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"n_telescopes": 3, "n_events": 5, "n_samples": 20}}"#).unwrap();

        let source = build_event_source(file.path()).unwrap();
        let events: Vec<_> = source.collect();
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].r1.as_ref().unwrap().len(), 3);
    }
}
