// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Black-box tests driving [airshower::Pipeline] over a synthetic array,
//! checking the shape of what comes out the other end rather than any
//! particular backend's encoding.

use indexmap::IndexMap;

use airshower::config::Config;
use airshower::event::{OpticsDescription, SubarrayDescription, TelescopeDescription};
use airshower::geom::CameraGeometry;
use airshower::io::{MemoryWriter, SyntheticEventSource, Writer};
use airshower::Pipeline;

fn three_telescope_array() -> SubarrayDescription {
    let mut telescopes = IndexMap::new();
    let mut positions = IndexMap::new();
    for (tel_id, (x, y)) in [(1u16, (-60.0, 0.0)), (2u16, (60.0, 0.0)), (3u16, (0.0, 80.0))] {
        telescopes.insert(
            tel_id,
            TelescopeDescription {
                camera_description: CameraGeometry::square_grid(30),
                optics_description: OpticsDescription {
                    mirror_area: 100.0,
                    equivalent_focal_length: 28.0,
                    effective_focal_length: 28.0,
                    num_mirrors: 1,
                    optics_name: "synthetic".to_string(),
                },
            },
        );
        positions.insert(tel_id, [x, y, 0.0]);
    }
    SubarrayDescription {
        name: "integration-test-array".to_string(),
        reference_position: [0.0, 0.0, 0.0],
        telescopes,
        positions,
    }
}

#[test]
fn runs_a_full_synthetic_array_end_to_end() {
    let array = three_telescope_array();
    let source = SyntheticEventSource::new(array, 5, 48);

    let config = Config::default();
    let writer: Box<dyn Writer> = Box::new(MemoryWriter::new());
    let mut pipeline = Pipeline::new(config, writer, None).unwrap();

    let n_written = pipeline.run(source).unwrap();
    assert_eq!(n_written, 5);
}

#[test]
fn restricting_to_one_telescope_still_completes_a_run() {
    let array = three_telescope_array();
    let source = SyntheticEventSource::new(array, 4, 48);

    let config = Config::default();
    let writer: Box<dyn Writer> = Box::new(MemoryWriter::new());
    let mut pipeline = Pipeline::new(config, writer, Some(vec![1])).unwrap();

    let n_written = pipeline.run(source).unwrap();
    assert_eq!(n_written, 4);
}

#[test]
fn an_empty_run_still_opens_and_closes_the_writer() {
    let array = three_telescope_array();
    let source = SyntheticEventSource::new(array, 0, 48);

    let config = Config::default();
    let writer: Box<dyn Writer> = Box::new(MemoryWriter::new());
    let mut pipeline = Pipeline::new(config, writer, None).unwrap();

    let n_written = pipeline.run(source).unwrap();
    assert_eq!(n_written, 0);
}
