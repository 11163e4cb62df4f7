// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A human-readable [Writer] backend: one newline-delimited JSON file per
//! data level, under a hierarchical directory layout (selected via
//! `output_type = "jsonl"`).

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::event::{ArrayEvent, SubarrayDescription};

use super::writer::{Writer, WriterError};

/// Writes one record per line to `<base>/<relative>.jsonl`.
struct JsonlFile {
    path: PathBuf,
    handle: Option<BufWriter<File>>,
}

impl JsonlFile {
    fn new(path: PathBuf) -> Self {
        Self { path, handle: None }
    }

    fn open(&mut self, overwrite: bool) -> Result<(), WriterError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if self.path.exists() && !overwrite {
            return Err(WriterError::AlreadyExists(self.path.display().to_string()));
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.path)?;
        self.handle = Some(BufWriter::new(file));
        Ok(())
    }

    fn write_value(&mut self, value: &serde_json::Value) -> Result<(), WriterError> {
        let handle = self.handle.as_mut().ok_or(WriterError::NotOpen)?;
        serde_json::to_writer(&mut *handle, value)?;
        handle.write_all(b"\n")?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        if let Some(mut handle) = self.handle.take() {
            handle.flush()?;
        }
        Ok(())
    }
}

/// A [Writer] backend that lays out `cfg/`, `subarray/` and `events/`
/// newline-delimited JSON files under `base_dir`, one hierarchical
/// namespace per data level.
pub struct JsonLinesWriter {
    base_dir: PathBuf,
    cfg_simulation_config: JsonlFile,
    cfg_atmosphere_model: JsonlFile,
    subarray: JsonlFile,
    events_r0: JsonlFile,
    events_r1: JsonlFile,
    events_dl0: JsonlFile,
    events_dl1: JsonlFile,
    events_dl1_image: JsonlFile,
    events_dl2: JsonlFile,
    events_simulation: JsonlFile,
    events_simulated_camera: JsonlFile,
    events_monitor: JsonlFile,
    events_pointing: JsonlFile,
}

impl JsonLinesWriter {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let at = |rel: &str| JsonlFile::new(base_dir.join(rel));
        Self {
            cfg_simulation_config: at("cfg/simulation_config.jsonl"),
            cfg_atmosphere_model: at("cfg/atmosphere_model.jsonl"),
            subarray: at("subarray/subarray.jsonl"),
            events_r0: at("events/r0.jsonl"),
            events_r1: at("events/r1.jsonl"),
            events_dl0: at("events/dl0.jsonl"),
            events_dl1: at("events/dl1.jsonl"),
            events_dl1_image: at("events/dl1_image.jsonl"),
            events_dl2: at("events/dl2.jsonl"),
            events_simulation: at("events/simulation.jsonl"),
            events_simulated_camera: at("events/simulated_camera.jsonl"),
            events_monitor: at("events/monitor.jsonl"),
            events_pointing: at("events/pointing.jsonl"),
            base_dir,
        }
    }

    fn all_files_mut(&mut self) -> [&mut JsonlFile; 13] {
        [
            &mut self.cfg_simulation_config,
            &mut self.cfg_atmosphere_model,
            &mut self.subarray,
            &mut self.events_r0,
            &mut self.events_r1,
            &mut self.events_dl0,
            &mut self.events_dl1,
            &mut self.events_dl1_image,
            &mut self.events_dl2,
            &mut self.events_simulation,
            &mut self.events_simulated_camera,
            &mut self.events_monitor,
            &mut self.events_pointing,
        ]
    }
}

impl Writer for JsonLinesWriter {
    fn open(&mut self, overwrite: bool) -> Result<(), WriterError> {
        fs::create_dir_all(&self.base_dir)?;
        for file in self.all_files_mut() {
            file.open(overwrite)?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), WriterError> {
        for file in self.all_files_mut() {
            file.close()?;
        }
        Ok(())
    }

    fn write_subarray(&mut self, subarray: &SubarrayDescription) -> Result<(), WriterError> {
        self.subarray.write_value(&serde_json::json!({
            "name": subarray.name,
            "reference_position": subarray.reference_position,
            "tel_positions": subarray.positions,
        }))
    }

    fn write_simulation_config(&mut self, config: &serde_json::Value) -> Result<(), WriterError> {
        self.cfg_simulation_config.write_value(config)
    }

    fn write_atmosphere_model(&mut self, model_name: &str) -> Result<(), WriterError> {
        self.cfg_atmosphere_model
            .write_value(&serde_json::json!({"atmosphere_model": model_name}))
    }

    fn write_r0(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.events_r0
            .write_value(&serde_json::json!({"event_id": event.event_id}))
    }

    fn write_r1(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.events_r1
            .write_value(&serde_json::json!({"event_id": event.event_id}))
    }

    fn write_dl0(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.events_dl0
            .write_value(&serde_json::json!({"event_id": event.event_id}))
    }

    fn write_dl1(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        let tel_ids: Vec<_> = event
            .dl1
            .as_ref()
            .map(|m| m.keys().copied().collect::<Vec<_>>())
            .unwrap_or_default();
        self.events_dl1
            .write_value(&serde_json::json!({"event_id": event.event_id, "tel_ids": tel_ids}))
    }

    fn write_dl1_image(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        if let Some(dl1) = &event.dl1 {
            for (tel_id, camera) in dl1.iter() {
                self.events_dl1_image.write_value(&serde_json::json!({
                    "event_id": event.event_id,
                    "tel_id": tel_id,
                    "image": camera.image,
                    "peak_time": camera.peak_time,
                }))?;
            }
        }
        Ok(())
    }

    fn write_dl2(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        if let Some(dl2) = &event.dl2 {
            for (name, geometry) in dl2.geometry.iter() {
                self.events_dl2.write_value(&serde_json::json!({
                    "event_id": event.event_id,
                    "reconstructor": name,
                    "geometry": geometry,
                }))?;
            }
        }
        Ok(())
    }

    fn write_simulation_shower(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        if let Some(shower) = event.simulation.as_ref().and_then(|s| s.shower) {
            self.events_simulation.write_value(&serde_json::json!({
                "event_id": event.event_id,
                "energy": shower.energy,
                "alt": shower.alt,
                "az": shower.az,
                "core_x": shower.core_x,
                "core_y": shower.core_y,
            }))?;
        }
        Ok(())
    }

    fn write_simulated_camera(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.events_simulated_camera
            .write_value(&serde_json::json!({"event_id": event.event_id}))
    }

    fn write_monitor(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        self.events_monitor
            .write_value(&serde_json::json!({"event_id": event.event_id}))
    }

    fn write_pointing(&mut self, event: &ArrayEvent) -> Result<(), WriterError> {
        if let Some(pointing) = &event.pointing {
            self.events_pointing.write_value(&serde_json::json!({
                "event_id": event.event_id,
                "array_altitude": pointing.array_altitude,
                "array_azimuth": pointing.array_azimuth,
            }))?;
        }
        Ok(())
    }
}
