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
use std::io::BufRead;
use std::path::Path;

use crate::reader::Encoding;
use crate::reader::FastqReader;

type E = Box<dyn std::error::Error>;

/// Upper bound on the number of records sampled for the mean read length.
pub const MAX_SAMPLED_RECORDS: u64 = 100_000;

/// No records were available to compute a mean over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyFileMetric;

impl std::fmt::Display for EmptyFileMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "no records to compute a mean read length over")
    }
}

impl std::error::Error for EmptyFileMetric {}

/// Mean read length over at most [MAX_SAMPLED_RECORDS] records.
///
/// Streaming stops at the record cap, at end of input, or at the first
/// structural violation; whatever was summed up to that point forms the mean.
/// Errors with [EmptyFileMetric] if not a single valid record was seen, so a
/// zero count never divides into a NaN.
///
/// ## Usage
///
/// ```rust
/// use readprep::metrics::mean_read_length;
/// use readprep::reader::{Encoding, FastqReader};
/// use std::io::Cursor;
///
/// let mut data = b"@SIMU-1:1:2:3:4#0\nACGTAC\n+\nIIIIII\n".to_vec();
/// data.append(&mut b"@SIMU-1:1:2:3:5#0\nACGT\n+\nIIII\n".to_vec());
///
/// let reader = FastqReader::new(Cursor::new(data), Encoding::Phred33);
/// assert_eq!(mean_read_length(reader).unwrap(), 5.0);
/// ```
pub fn mean_read_length<R: BufRead>(records: FastqReader<R>) -> Result<f64, EmptyFileMetric> {
    let mut total_length: u64 = 0;
    let mut total_reads: u64 = 0;

    for record in records {
        let Ok(record) = record else {
            // The reader has logged the violation and stopped.
            break;
        };
        total_length += record.len() as u64;
        total_reads += 1;
        if total_reads >= MAX_SAMPLED_RECORDS {
            break;
        }
    }

    if total_reads == 0 {
        return Err(EmptyFileMetric);
    }

    Ok(total_length as f64 / total_reads as f64)
}

/// Opens `path` and computes [mean_read_length] over its prefix.
pub fn file_mean_read_length(path: &Path, encoding: Encoding) -> Result<f64, E> {
    let reader = FastqReader::from_path(path, encoding)?;
    let mean = mean_read_length(reader)?;
    log::debug!("{}: mean read length {:.1}", path.display(), mean);
    Ok(mean)
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn mean_over_unequal_lengths() {
        use super::mean_read_length;
        use crate::reader::Encoding;
        use crate::reader::FastqReader;
        use std::io::Cursor;

        let mut data = b"@SIMU-1:1:2:3:4#0\nACGTACGT\n+\nIIIIIIII\n".to_vec();
        data.append(&mut b"@SIMU-1:1:2:3:5#0\nAC\n+\nII\n".to_vec());
        data.append(&mut b"@SIMU-1:1:2:3:6#0\nACGTA\n+\nIIIII\n".to_vec());

        let reader = FastqReader::new(Cursor::new(data), Encoding::Phred33);
        assert_eq!(mean_read_length(reader).unwrap(), 5.0);
    }

    #[test]
    fn empty_input_is_a_distinguishable_error() {
        use super::EmptyFileMetric;
        use super::mean_read_length;
        use crate::reader::Encoding;
        use crate::reader::FastqReader;
        use std::io::Cursor;

        let reader = FastqReader::new(Cursor::new(Vec::new()), Encoding::Phred33);
        let got = mean_read_length(reader).unwrap_err();

        assert_eq!(got, EmptyFileMetric);
    }

    #[test]
    fn violation_on_the_first_record_is_empty() {
        use super::EmptyFileMetric;
        use super::mean_read_length;
        use crate::reader::Encoding;
        use crate::reader::FastqReader;
        use std::io::Cursor;

        let data = b"no header here\nACGT\n+\nIIII\n".to_vec();
        let reader = FastqReader::new(Cursor::new(data), Encoding::Phred33);

        assert_eq!(mean_read_length(reader).unwrap_err(), EmptyFileMetric);
    }

    #[test]
    fn violation_mid_stream_averages_the_valid_prefix() {
        use super::mean_read_length;
        use crate::reader::Encoding;
        use crate::reader::FastqReader;
        use std::io::Cursor;

        let mut data = b"@SIMU-1:1:2:3:4#0\nACGTAC\n+\nIIIIII\n".to_vec();
        data.append(&mut b"@SIMU-1:1:2:3:5#0\nACGT\n+\nII\n".to_vec());

        let reader = FastqReader::new(Cursor::new(data), Encoding::Phred33);
        assert_eq!(mean_read_length(reader).unwrap(), 6.0);
    }
}
