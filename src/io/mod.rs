// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Event input ([EventSource]) and output ([DataWriter]) boundaries.
//! Both are small, explicit traits over external collaborators; this
//! crate ships only the fixtures needed to exercise them end to end.

mod data_writer;
mod descriptor;
mod jsonlines_writer;
mod memory_writer;
mod source;
mod writer;
mod writer_registry;

pub use data_writer::DataWriter;
pub use descriptor::{build_event_source, RunDescriptor};
pub use jsonlines_writer::JsonLinesWriter;
pub use memory_writer::MemoryWriter;
pub use source::{EventSource, SyntheticEventSource};
pub use writer::{Writer, WriterError};
pub use writer_registry::build_writer;
