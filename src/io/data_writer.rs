// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! [DataWriter]: the router that owns the output file and, for each
//! event, calls exactly the enabled and present `write_*` methods on its
//! backend.

use crate::config::DataWriterConfig;
use crate::event::{ArrayEvent, SubarrayDescription};

use super::writer::{Writer, WriterError};

pub struct DataWriter {
    backend: Box<dyn Writer>,
    config: DataWriterConfig,
}

impl DataWriter {
    pub fn new(backend: Box<dyn Writer>, config: DataWriterConfig) -> Self {
        Self { backend, config }
    }

    /// Open the backend and emit the one-shot metadata writes (subarray,
    /// simulation_config, atmosphere_model), each gated by its own
    /// configuration flag.
    pub fn open(
        &mut self,
        subarray: &SubarrayDescription,
        simulation_config: &serde_json::Value,
        atmosphere_model: &str,
    ) -> Result<(), WriterError> {
        self.backend.open(self.config.overwrite)?;
        if self.config.write_subarray {
            self.backend.write_subarray(subarray)?;
        }
        if self.config.write_simulation_config {
            self.backend.write_simulation_config(simulation_config)?;
        }
        if self.config.write_atmosphere_model {
            self.backend.write_atmosphere_model(atmosphere_model)?;
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), WriterError> {
        self.backend.close()
    }

    /// Write whichever enabled data levels are present on `event`.
    pub fn write_event(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        if self.config.write_r0 && event.r0.is_some() {
            self.backend.write_r0(event)?;
        }
        if self.config.write_r1 && event.r1.is_some() {
            self.backend.write_r1(event)?;
        }
        if self.config.write_dl0 && event.dl0.is_some() {
            self.backend.write_dl0(event)?;
        }
        if self.config.write_dl1 && event.dl1.is_some() {
            self.backend.write_dl1(event)?;
        }
        if self.config.write_dl1_image && event.dl1.is_some() {
            self.backend.write_dl1_image(event)?;
        }
        if self.config.write_dl2 && event.dl2.is_some() {
            self.backend.write_dl2(event)?;
        }
        if self.config.write_simulation_shower && event.simulation.is_some() {
            self.backend.write_simulation_shower(event)?;
        }
        if self.config.write_simulated_camera && event.simulation.is_some() {
            self.backend.write_simulated_camera(event)?;
        }
        if self.config.write_monitor && event.monitor.is_some() {
            self.backend.write_monitor(event)?;
        }
        if self.config.write_pointing && event.pointing.is_some() {
            self.backend.write_pointing(event)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{OpticsDescription, Pointing, SubarrayDescription, TelescopeDescription};
    use crate::geom::CameraGeometry;
    use crate::io::MemoryWriter;
    use indexmap::IndexMap;

    fn subarray() -> SubarrayDescription {
        let mut telescopes = IndexMap::new();
        let mut positions = IndexMap::new();
        telescopes.insert(
            1u16,
            TelescopeDescription {
                camera_description: CameraGeometry::square_grid(4),
                optics_description: OpticsDescription {
                    mirror_area: 1.0,
                    equivalent_focal_length: 1.0,
                    effective_focal_length: 1.0,
                    num_mirrors: 1,
                    optics_name: "t".into(),
                },
            },
        );
        positions.insert(1u16, [0.0, 0.0, 0.0]);
        SubarrayDescription {
            name: "t".into(),
            reference_position: [0.0, 0.0, 0.0],
            telescopes,
            positions,
        }
    }

    #[test]
    fn disabled_layer_is_never_written_even_if_present() {
        let mut config = DataWriterConfig::default();
        config.write_pointing = false;
        let writer = Box::new(MemoryWriter::new());
        let mut data_writer = DataWriter::new(writer, config);
        data_writer
            .open(&subarray(), &serde_json::json!({}), "Exponential")
            .unwrap();

        let mut event = ArrayEvent::new(0, 0);
        event.pointing = Some(Pointing::default());
        data_writer.write_event(&event).unwrap();
        data_writer.close().unwrap();
    }

    #[test]
    fn enabled_layer_absent_on_event_is_skipped_without_error() {
        let config = DataWriterConfig::default();
        let writer = Box::new(MemoryWriter::new());
        let mut data_writer = DataWriter::new(writer, config);
        data_writer
            .open(&subarray(), &serde_json::json!({}), "Exponential")
            .unwrap();

        let event = ArrayEvent::new(0, 0);
        data_writer.write_event(&event).unwrap();
        data_writer.close().unwrap();
    }
}
