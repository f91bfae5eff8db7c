// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod bounds;
mod profile;
mod reader;

pub use bounds::Bounds;
pub use profile::{Profile, WayClass, CAMPUS_PROFILE};
pub use reader::{load_from_buffer, load_from_file, load_from_io, Error, FileFormat, Options};
