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
use regex::Regex;

use crate::Platform;

/// Header grammar of one dialect: the full-match pattern deciding membership
/// and the sub-pattern extracting the library key.
///
/// The key pattern shares its field boundaries with the dialect pattern, so
/// two files group together only when the matched substrings are
/// byte-identical. For the Illumina dialects the key covers the
/// instrument/run/flowcell/coordinate prefix; for SRA it covers the whole
/// accession line (read coordinates and all, mates share them per spot); for
/// PacBio it is the movie name.
struct Grammar {
    platform: Platform,
    dialect: Regex,
    key: Regex,
}

/// Matches record headers against the known [Platform] dialects.
///
/// Dialects are tried in a fixed priority order (old Illumina, new Illumina,
/// old SRA, new SRA, PacBio) and the first one whose pattern matches the
/// entire header wins.
///
/// ## Usage
///
/// ```rust
/// use readprep::Platform;
/// use readprep::dialect::Classifier;
///
/// let classifier = Classifier::new();
///
/// let header = "@D00468:24:H8ELMADXX:1:1101:1470:2237 1:N:0:2";
/// assert_eq!(classifier.platform(header), Platform::IlluminaNew);
///
/// let (platform, library) = classifier.library_key(header).unwrap();
/// assert_eq!(platform, Platform::IlluminaNew);
/// assert_eq!(library, "@D00468:24:H8ELMADXX:1:1101:1470:2237 ");
/// ```
pub struct Classifier {
    grammars: Vec<Grammar>,
}

impl Classifier {
    pub fn new() -> Self {
        let specs: [(Platform, &str, &str); 5] = [
            (
                Platform::IlluminaOld,
                r"^@\w+-?\w+:\d+:\d+:\d+:\d+#\d*$",
                r"@\w+-?\w+:\d+:\d+:\d+:\d+#\d",
            ),
            (
                Platform::IlluminaNew,
                r"^@\w+-?\w+:\d+:\w+-?\w+:\d+:\d+:\d+:\d+\s\d:\w+:\w+:\w*$",
                r"@\w+-?\w+:\d+:\w+-?\w+:\d+:\d+:\d+:\d+\s",
            ),
            (
                Platform::SraOld,
                r"^@\w+\.?\w? \w+-\w+:\d+:\d+:\d+:\d+ length=\d+$",
                r"@\w+\.?\w? \w+-\w+:\d+:\d+:\d+:\d+ length=\d+",
            ),
            (
                Platform::SraNew,
                r"^@\w+\.?\w? \w+-\w+:\d+:\w+:\d+:\d+:\d+:\d+ length=\d+$",
                r"@\w+\.?\w? \w+-\w+:\d+:\w+:\d+:\d+:\d+:\d+ length=\d+",
            ),
            (
                Platform::PacBio,
                r"^@\w+/\d+/\d+_\d+$",
                r"@\w+_\d+_\d+_\w+",
            ),
        ];

        let grammars = specs
            .iter()
            .map(|(platform, dialect, key)| Grammar {
                platform: *platform,
                // The patterns are fixed strings, compiling them cannot fail.
                dialect: Regex::new(dialect).unwrap(),
                key: Regex::new(key).unwrap(),
            })
            .collect();

        Classifier { grammars }
    }

    /// Returns the dialect whose pattern matches the entire header, or
    /// [Platform::Unknown] if none does.
    pub fn platform(&self, header: &str) -> Platform {
        self.grammars
            .iter()
            .find(|grammar| grammar.dialect.is_match(header))
            .map(|grammar| grammar.platform)
            .unwrap_or(Platform::Unknown)
    }

    /// Returns the dialect and the extracted library key, or None if the
    /// header matches no dialect.
    pub fn library_key(&self, header: &str) -> Option<(Platform, String)> {
        let grammar = self
            .grammars
            .iter()
            .find(|grammar| grammar.dialect.is_match(header))?;
        let key = grammar.key.find(header)?.as_str().to_string();
        Some((grammar.platform, key))
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}
