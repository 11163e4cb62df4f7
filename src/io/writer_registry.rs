// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A small factory selecting a [Writer] backend by `output_type` name,
//! so new backends can be added without touching [super::DataWriter].

use std::path::Path;

use super::jsonlines_writer::JsonLinesWriter;
use super::memory_writer::MemoryWriter;
use super::writer::Writer;

/// Build the named backend. `output_path` is only consulted by
/// file-backed backends. Returns `None` for an unrecognized
/// `output_type`, including `"root"`, whose real implementation is an
/// external collaborator out of this crate's scope.
pub fn build_writer(output_type: &str, output_path: &Path) -> Option<Box<dyn Writer>> {
    match output_type {
        "memory" => Some(Box::new(MemoryWriter::new())),
        "jsonl" => Some(Box::new(JsonLinesWriter::new(output_path))),
        _ => None,
    }
}
