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
use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::FastqRecord;

type E = Box<dyn std::error::Error>;

/// Largest quality character any supported encoding maps to a score.
pub const PHRED_MAX_CHAR: u8 = 125;

/// Supported quality score encodings.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    #[default]
    Phred33,
    Phred64,
}

impl Encoding {
    fn offset(self) -> u8 {
        match self {
            Encoding::Phred33 => 33,
            Encoding::Phred64 => 64,
        }
    }

    /// Maps a quality character to its score, or None if the character falls
    /// outside the encoding's table.
    pub fn decode(self, chr: u8) -> Option<u8> {
        if (self.offset()..=PHRED_MAX_CHAR).contains(&chr) {
            Some(chr - self.offset())
        } else {
            None
        }
    }

    /// Maps a score back to its quality character.
    pub fn encode(self, score: u8) -> u8 {
        score + self.offset()
    }
}

impl std::str::FromStr for Encoding {
    type Err = UnsupportedEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phred33" => Ok(Encoding::Phred33),
            "phred64" => Ok(Encoding::Phred64),
            _ => Err(UnsupportedEncoding { token: s.to_string() }),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Encoding::Phred33 => write!(f, "phred33"),
            Encoding::Phred64 => write!(f, "phred64"),
        }
    }
}

/// Quality encoding token not recognized by [Encoding].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedEncoding {
    pub token: String,
}

impl std::fmt::Display for UnsupportedEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "unsupported quality encoding '{}'", self.token)
    }
}

impl std::error::Error for UnsupportedEncoding {}

/// Structural rules checked on every record, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    InvalidHeader,
    InvalidSeparator,
    QualityOutOfRange,
    LengthMismatch,
    EmptySequence,
}

/// A record broke one of the structural [Rule]s.
///
/// `record` is the 1-based index of the offending record within its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatViolation {
    pub rule: Rule,
    pub record: u64,
}

impl std::fmt::Display for FormatViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let what = match self.rule {
            Rule::InvalidHeader => "invalid header in fastq record",
            Rule::InvalidSeparator => "invalid secondary header in fastq record",
            Rule::QualityOutOfRange => "quality character outside encoding range",
            Rule::LengthMismatch => "sequence and quality strings of unequal length",
            Rule::EmptySequence => "sequence data missing",
        };
        write!(f, "{}; record number: {}", what, self.record)
    }
}

impl std::error::Error for FormatViolation {}

/// Streaming FASTQ record reader.
///
/// Reads one 4-line block per call to [next](Iterator::next), validating the
/// block and decoding its quality string. The first structural violation ends
/// the stream: the offending record is yielded as an error and no further
/// records follow. A trailing incomplete block ends the stream normally.
///
/// The underlying connection is owned by the reader and dropped with it, so
/// file handles are released on every exit path.
///
/// ## Usage
///
/// ```rust
/// use readprep::reader::{Encoding, FastqReader};
/// use std::io::Cursor;
///
/// let data = b"@SRR037455.1 HWI-E4_6_30ACL:4:1:0:29 length=4\nACGT\n+\nIIII\n".to_vec();
/// let mut reader = FastqReader::new(Cursor::new(data), Encoding::Phred33);
///
/// let record = reader.next().unwrap().unwrap();
/// assert_eq!(record.seq, "ACGT");
/// assert_eq!(record.quals, vec![40, 40, 40, 40]);
/// assert!(reader.next().is_none());
/// ```
pub struct FastqReader<R: BufRead> {
    conn: R,
    encoding: Encoding,
    record: u64,
    finished: bool,
}

impl FastqReader<Box<dyn BufRead>> {
    /// Opens a read file, transparently decompressing `.gz` input.
    pub fn from_path(path: &Path, encoding: Encoding) -> Result<Self, E> {
        let file = File::open(path)?;
        let is_gzipped = path.extension().is_some_and(|ext| ext == "gz");
        let conn: Box<dyn BufRead> = if is_gzipped {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(FastqReader::new(conn, encoding))
    }
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(conn: R, encoding: Encoding) -> Self {
        FastqReader { conn, encoding, record: 0, finished: false }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Number of records pulled from the stream so far, including a final
    /// invalid one.
    pub fn records_read(&self) -> u64 {
        self.record
    }

    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.conn.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                while line.ends_with('\n') || line.ends_with('\r') {
                    line.pop();
                }
                Some(line)
            }
            Err(err) => {
                log::error!("read failed after record {}: {}", self.record, err);
                None
            }
        }
    }

    fn validate(
        &self,
        header: &str,
        seq: &str,
        sheader: &str,
        qline: &str,
    ) -> Result<Vec<u8>, FormatViolation> {
        let fail = |rule| FormatViolation { rule, record: self.record };

        if !header.starts_with('@') {
            return Err(fail(Rule::InvalidHeader));
        }
        if !sheader.starts_with('+') {
            return Err(fail(Rule::InvalidSeparator));
        }
        let quals = qline
            .bytes()
            .map(|chr| self.encoding.decode(chr).ok_or_else(|| fail(Rule::QualityOutOfRange)))
            .collect::<Result<Vec<u8>, FormatViolation>>()?;
        if seq.len() != quals.len() {
            return Err(fail(Rule::LengthMismatch));
        }
        if seq.is_empty() {
            return Err(fail(Rule::EmptySequence));
        }

        Ok(quals)
    }
}

impl<R: BufRead> Iterator for FastqReader<R> {
    type Item = Result<FastqRecord, FormatViolation>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(header) = self.next_line() else {
            self.finished = true;
            return None;
        };
        let (Some(seq), Some(sheader), Some(qline)) =
            (self.next_line(), self.next_line(), self.next_line())
        else {
            // No complete 4-line block left.
            self.finished = true;
            return None;
        };
        self.record += 1;

        match self.validate(&header, &seq, &sheader, &qline) {
            Ok(quals) => Some(Ok(FastqRecord { header, sheader, seq, quals })),
            Err(violation) => {
                log::error!("{}", violation);
                self.finished = true;
                Some(Err(violation))
            }
        }
    }
}
