// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An in-memory [Writer], used by tests to assert on what a pipeline run
//! would have persisted without touching a filesystem.

use serde_json::Value;

use crate::event::{ArrayEvent, SubarrayDescription, TelId};

use super::writer::{Writer, WriterError};

#[derive(Default)]
pub struct MemoryWriter {
    is_open: bool,
    pub subarray: Option<Value>,
    pub simulation_config: Option<Value>,
    pub atmosphere_model: Option<String>,
    pub r0: Vec<Value>,
    pub r1: Vec<Value>,
    pub dl0: Vec<Value>,
    pub dl1: Vec<Value>,
    pub dl1_image: Vec<Value>,
    pub dl2: Vec<Value>,
    pub simulation_shower: Vec<Value>,
    pub simulated_camera: Vec<Value>,
    pub monitor: Vec<Value>,
    pub pointing: Vec<Value>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn require_open(&self) -> Result<(), WriterError> {
        if self.is_open {
            Ok(())
        } else {
            Err(WriterError::NotOpen)
        }
    }
}

impl Writer for MemoryWriter {
    fn open(&mut self, _overwrite: bool) -> Result<(), WriterError> {
        self.is_open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        self.require_open()?;
        self.is_open = false;
        Ok(())
    }

    fn write_subarray(&mut self, subarray: &SubarrayDescription) -> Result<(), WriterError> {
        self.require_open()?;
        self.subarray = Some(serde_json::json!({
            "name": subarray.name,
            "reference_position": subarray.reference_position,
            "tel_positions": subarray.positions,
        }));
        Ok(())
    }

    fn write_simulation_config(&mut self, config: &serde_json::Value) -> Result<(), WriterError> {
        self.require_open()?;
        self.simulation_config = Some(config.clone());
        Ok(())
    }

    fn write_atmosphere_model(&mut self, model_name: &str) -> Result<(), WriterError> {
        self.require_open()?;
        self.atmosphere_model = Some(model_name.to_string());
        Ok(())
    }

    fn write_r0(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        self.r0.push(serde_json::json!({"event_id": event.event_id}));
        Ok(())
    }

    fn write_r1(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        self.r1.push(serde_json::json!({"event_id": event.event_id}));
        Ok(())
    }

    fn write_dl0(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        self.dl0.push(serde_json::json!({"event_id": event.event_id}));
        Ok(())
    }

    fn write_dl1(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        let tel_ids: Vec<TelId> = event.dl1.as_ref().map(|m| m.keys().copied().collect()).unwrap_or_default();
        self.dl1.push(serde_json::json!({"event_id": event.event_id, "tel_ids": tel_ids}));
        Ok(())
    }

    fn write_dl1_image(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        if let Some(dl1) = &event.dl1 {
            for (tel_id, camera) in dl1.iter() {
                self.dl1_image.push(serde_json::json!({
                    "event_id": event.event_id,
                    "tel_id": tel_id,
                    "image": camera.image,
                    "peak_time": camera.peak_time,
                }));
            }
        }
        Ok(())
    }

    fn write_dl2(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        if let Some(dl2) = &event.dl2 {
            for (name, geometry) in dl2.geometry.iter() {
                self.dl2.push(serde_json::json!({
                    "event_id": event.event_id,
                    "reconstructor": name,
                    "geometry": geometry,
                }));
            }
        }
        Ok(())
    }

    fn write_simulation_shower(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        if let Some(shower) = event.simulation.as_ref().and_then(|s| s.shower) {
            self.simulation_shower.push(serde_json::json!({
                "event_id": event.event_id,
                "energy": shower.energy,
                "alt": shower.alt,
                "az": shower.az,
                "core_x": shower.core_x,
                "core_y": shower.core_y,
            }));
        }
        Ok(())
    }

    fn write_simulated_camera(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        self.simulated_camera.push(serde_json::json!({"event_id": event.event_id}));
        Ok(())
    }

    fn write_monitor(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        self.monitor.push(serde_json::json!({"event_id": event.event_id}));
        Ok(())
    }

    fn write_pointing(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.require_open()?;
        if let Some(pointing) = &event.pointing {
            self.pointing.push(serde_json::json!({
                "event_id": event.event_id,
                "array_altitude": pointing.array_altitude,
                "array_azimuth": pointing.array_azimuth,
            }));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ArrayEvent;

    #[test]
    fn writes_fail_before_open() {
        let mut writer = MemoryWriter::new();
        let event = ArrayEvent::new(0, 0);
        assert!(matches!(writer.write_r1(&event), Err(WriterError::NotOpen)));
    }

    #[test]
    fn open_then_close_round_trips() {
        let mut writer = MemoryWriter::new();
        writer.open(true).unwrap();
        let event = ArrayEvent::new(5, 0);
        writer.write_r1(&event).unwrap();
        assert_eq!(writer.r1.len(), 1);
        writer.close().unwrap();
        assert!(writer.write_r1(&event).is_err());
    }
}
