// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The [Writer] trait: the backend-agnostic output contract. A concrete
//! persistent serializer is an external collaborator; this crate only
//! specifies the contract and ships two exercising backends
//! ([super::MemoryWriter], [super::JsonLinesWriter]).

use thiserror::Error;

use crate::event::{ArrayEvent, SubarrayDescription};

#[derive(Error, Debug)]
pub enum WriterError {
    #[error("output already exists and overwrite was not requested: {0}")]
    AlreadyExists(String),

    #[error("writer used before open() or after close()")]
    NotOpen,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A backend capable of persisting an [ArrayEvent] and its associated
/// metadata. Every method after `open` is called at most once per event
/// (the one-shot metadata writes are called once, immediately after
/// `open`).
pub trait Writer {
    fn open(&mut self, overwrite: bool) -> Result<(), WriterError>;
    fn close(&mut self) -> Result<(), WriterError>;

    fn write_subarray(&mut self, subarray: &SubarrayDescription) -> Result<(), WriterError>;
    fn write_simulation_config(&mut self, config: &serde_json::Value) -> Result<(), WriterError>;
    fn write_atmosphere_model(&mut self, model_name: &str) -> Result<(), WriterError>;

    fn write_r0(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_r1(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_dl0(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_dl1(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_dl1_image(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_dl2(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_simulation_shower(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_simulated_camera(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_monitor(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
    fn write_pointing(&mut self, event: &ArrayEvent) -> Result<(), WriterError>;
}
