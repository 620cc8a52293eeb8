// readprep: Sequencing input classification for assembly pipelines.
//
// Copyright 2026 readprep contributors.
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//

//! readprep is a library and a command-line client for:
//!
//!   - Streaming validated FASTQ records from plain or gzipped read files.
//!   - Detecting the sequencing platform from the header of the first record.
//!   - Grouping read files that belong to the same library into samples.
//!
//! The following header dialects are recognized:
//!   - Old-style Illumina (instrument:run:lane:tile:x:y with a `#index` tag)
//!   - New-style Illumina (Casava 1.8+ with a read-number:filter:control:index suffix)
//!   - SRA accessions wrapping either Illumina style
//!   - PacBio movie/hole/range long-read names
//!
//! ## Usage
//!
//! ### Command line
//!
//! The readprep CLI supports the following subcommands:
//!   - `readprep classify` group the read files in a directory into samples.
//!   - `readprep check` validate a single read file record by record.
//!   - `readprep stats` report the mean read length of a file.
//!
//! ### Rust API
//!
//! For use cases requiring access to a single record at a time, the following
//! structs are provided:
//!
//!   - [FastqReader](reader::FastqReader): streams [FastqRecord]s from a [std::io::BufRead], validating each.
//!   - [Classifier](dialect::Classifier): matches record headers against the known dialects.
//!   - [SampleRegistry](registry::SampleRegistry): folds the files in a directory into [Sample]s.
//!
//! See documentation for the appropriate functions or structs for usage examples.

use std::path::PathBuf;

pub mod dialect;
pub mod metrics;
pub mod reader;
pub mod registry;

/// Mean read length (in bases) at which a library counts as long-read.
pub const LONG_READ_MIN_MEAN: f64 = 1000.0;

/// One sequencing read, decoded from a 4-line FASTQ block.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FastqRecord {
    /// Primary header line, starts with `@`.
    pub header: String,
    /// Secondary header (separator) line, starts with `+`.
    pub sheader: String,
    /// Base calls. Never empty in a validated record.
    pub seq: String,
    /// Decoded quality scores, one per base.
    pub quals: Vec<u8>,
}

impl FastqRecord {
    /// Number of bases in the read.
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

/// Recognized header dialects.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Platform {
    IlluminaOld,
    IlluminaNew,
    SraOld,
    SraNew,
    PacBio,
    #[default]
    Unknown,
}

impl Platform {
    /// Name of the sequencing technology behind the dialect.
    ///
    /// SRA accessions wrap Illumina headers, so every short-read dialect
    /// reports as Illumina.
    pub fn technology(&self) -> &'static str {
        match self {
            Platform::PacBio => "Pacbio",
            Platform::Unknown => "unknown",
            _ => "Illumina",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "illumina-old" => Ok(Platform::IlluminaOld),
            "illumina-new" => Ok(Platform::IlluminaNew),
            "sra-old" => Ok(Platform::SraOld),
            "sra-new" => Ok(Platform::SraNew),
            "pacbio" => Ok(Platform::PacBio),
            _ => Err(format!("'{}' is not a valid Platform", s)),
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Platform::IlluminaOld => "illumina-old",
            Platform::IlluminaNew => "illumina-new",
            Platform::SraOld => "sra-old",
            Platform::SraNew => "sra-new",
            Platform::PacBio => "pacbio",
            Platform::Unknown => "unknown",
        };
        write!(f, "{}", name)
    }
}

/// Coarse library flavor used to select downstream assembly parameters.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PrepType {
    /// Short paired reads, Illumina-style.
    #[default]
    Short,
    /// Long reads, PacBio-style.
    Long,
    /// Unpaired short reads.
    Single,
    /// Mate-pair short reads.
    Mate,
}

impl PrepType {
    /// Infers the library flavor from the detected dialect and the mean read
    /// length over a bounded prefix of the file.
    pub fn infer(platform: Platform, mean_read_length: f64) -> PrepType {
        match platform {
            Platform::PacBio => PrepType::Long,
            _ if mean_read_length >= crate::LONG_READ_MIN_MEAN => PrepType::Long,
            _ => PrepType::Short,
        }
    }
}

impl std::str::FromStr for PrepType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(PrepType::Short),
            "long" => Ok(PrepType::Long),
            "single" => Ok(PrepType::Single),
            "mate" => Ok(PrepType::Mate),
            _ => Err(format!("'{}' is not a valid PrepType", s)),
        }
    }
}

impl std::fmt::Display for PrepType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            PrepType::Short => "short",
            PrepType::Long => "long",
            PrepType::Single => "single",
            PrepType::Mate => "mate",
        };
        write!(f, "{}", name)
    }
}

/// One library discovered in the input directory.
///
/// Holds one file path if the library is unpaired and two if a second file
/// extracting the same library key was found. `paired` is true exactly when
/// a second file has been folded in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sample {
    /// Library key extracted from the header of the first record.
    pub library: String,
    /// Sequencing technology name, see [Platform::technology].
    pub technology: String,
    /// Read files contributing to this library, in discovery order.
    pub files: Vec<PathBuf>,
    pub prep: PrepType,
    pub paired: bool,
}

impl Sample {
    pub fn new(library: &str, platform: Platform, prep: PrepType, file: PathBuf) -> Self {
        Sample {
            library: library.to_string(),
            technology: platform.technology().to_string(),
            files: vec![file],
            prep,
            paired: false,
        }
    }
}
