// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use graph_builder::GraphBuilder;

use crate::osm::{Bounds, Profile, CAMPUS_PROFILE};
use crate::Engine;

mod graph_builder;
mod model;
mod xml;

/// Format of the input OSM file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileFormat {
    /// Unknown format - guess the format based on the content
    #[default]
    Unknown,

    /// Force uncompressed [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    Xml,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [gzip](https://en.wikipedia.org/wiki/Gzip) compression
    XmlGz,

    /// Force [OSM XML](https://wiki.openstreetmap.org/wiki/OSM_XML)
    /// with [bzip2](https://en.wikipedia.org/wiki/Bzip2) compression
    XmlBz2,
}

impl FileFormat {
    /// Guesses the format by looking at the magic bytes at the start of the data.
    /// Never returns [FileFormat::Unknown].
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&[0x1f, 0x8b]) {
            Self::XmlGz
        } else if head.starts_with(b"BZh") {
            Self::XmlBz2
        } else {
            Self::Xml
        }
    }
}

/// Additional controls for interpreting OSM data as a routing [Engine].
#[derive(Debug, Clone, Copy)]
pub struct Options<'a> {
    /// How OSM features should be interpreted and converted into a [Graph](crate::Graph).
    pub profile: &'a Profile<'a>,

    /// Format of the input data.
    pub file_format: FileFormat,

    /// Query region assumed if the data has no `<bounds>` element.
    pub fallback_bounds: Bounds,
}

impl Default for Options<'static> {
    fn default() -> Self {
        Self {
            profile: &CAMPUS_PROFILE,
            file_format: FileFormat::Unknown,
            fallback_bounds: Bounds::FALLBACK,
        }
    }
}

/// Errors which prevent OSM data from being loaded.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read OSM data: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse OSM XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Parse OSM features from a reader into an [Engine] as per the provided [Options].
///
/// The provided stream will be automatically wrapped in a buffered reader when needed.
pub fn load_from_io<R: io::Read>(options: &Options<'_>, reader: R) -> Result<Engine, Error> {
    let mut b = io::BufReader::new(reader);

    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(b.fill_buf()?),
        f => f,
    };
    log::debug!("reading OSM data as {:?}", format);

    match format {
        FileFormat::Unknown | FileFormat::Xml => {
            let r = xml::Reader::from_io(b);
            Ok(GraphBuilder::new(options).add_features(r)?)
        }

        FileFormat::XmlGz => {
            let d = flate2::read::MultiGzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            Ok(GraphBuilder::new(options).add_features(r)?)
        }

        FileFormat::XmlBz2 => {
            let d = bzip2::read::MultiBzDecoder::new(b);
            let r = xml::Reader::from_io(io::BufReader::new(d));
            Ok(GraphBuilder::new(options).add_features(r)?)
        }
    }
}

/// Parse OSM features from a file at the provided path into an [Engine] as per the provided [Options].
pub fn load_from_file<P: AsRef<Path>>(options: &Options<'_>, path: P) -> Result<Engine, Error> {
    let f = File::open(path)?;
    load_from_io(options, f)
}

/// Parse OSM features from a static buffer into an [Engine] as per the provided [Options].
pub fn load_from_buffer(options: &Options<'_>, data: &[u8]) -> Result<Engine, Error> {
    let format = match options.file_format {
        FileFormat::Unknown => FileFormat::detect(data),
        f => f,
    };

    if format == FileFormat::Xml {
        // Fast path is available for in-memory XML data
        let r = xml::Reader::from_buffer(data);
        Ok(GraphBuilder::new(options).add_features(r)?)
    } else {
        // Wrap the buffer in a cursor and use the IO path
        let cursor = io::Cursor::new(data);
        load_from_io(&Options { file_format: format, ..*options }, cursor)
    }
}
