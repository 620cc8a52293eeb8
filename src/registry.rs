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
use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use regex::Regex;

use crate::PrepType;
use crate::Sample;
use crate::dialect::Classifier;
use crate::metrics::file_mean_read_length;
use crate::reader::Encoding;
use crate::reader::FastqReader;

type E = Box<dyn std::error::Error>;

/// Outcome of folding one file into the sample map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Folded {
    /// First file seen for this library key.
    Inserted,
    /// The key was already present; the file was appended as a mate.
    Appended,
}

/// Lists candidate read files in `dir`, sorted by file name.
///
/// A candidate carries a `.fastq`, `.fq`, `.fastq.gz`, or `.fq.gz` suffix.
/// Sorting keeps mate ordering stable across platforms; the suffix convention
/// usually sorts the forward `_1`/`_R1` file first.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, E> {
    let suffix = Regex::new(r"\.(fq|fastq)(\.gz)?$").unwrap();

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| suffix.is_match(name))
        })
        .collect();
    files.sort();

    Ok(files)
}

/// Builds the library key to [Sample] mapping for a directory of read files.
///
/// Each candidate file contributes its first record's header for dialect
/// classification and a bounded read-length mean for the prep type. Files are
/// folded in discovery order: the first file for a key creates the sample,
/// a second file appends itself and marks the sample paired.
///
/// Files that cannot be classified are logged and skipped; only failing to
/// list the directory itself aborts the build.
///
/// ## Usage
///
/// ```no_run
/// use readprep::reader::Encoding;
/// use readprep::registry::SampleRegistry;
/// use std::path::Path;
///
/// let registry = SampleRegistry::new(Encoding::Phred33);
/// let samples = registry.build(Path::new("reads/")).unwrap();
///
/// for (library, sample) in &samples {
///     println!("{}: {} file(s), {}", library, sample.files.len(), sample.prep);
/// }
/// ```
pub struct SampleRegistry {
    encoding: Encoding,
    classifier: Classifier,
    samples: IndexMap<String, Sample>,
}

impl SampleRegistry {
    pub fn new(encoding: Encoding) -> Self {
        SampleRegistry {
            encoding,
            classifier: Classifier::new(),
            samples: IndexMap::new(),
        }
    }

    /// Consumes the registry and returns the completed sample map.
    pub fn build(mut self, dir: &Path) -> Result<IndexMap<String, Sample>, E> {
        let files = discover(dir)?;
        log::info!("{}: {} candidate read file(s)", dir.display(), files.len());

        for file in files {
            self.fold_file(&file);
        }

        // A lone short-read file is a single-end library.
        for sample in self.samples.values_mut() {
            if !sample.paired && sample.prep == PrepType::Short {
                sample.prep = PrepType::Single;
            }
        }

        Ok(self.samples)
    }

    /// Classifies one file and inserts or appends it in the sample map.
    /// Returns None if the file was skipped.
    fn fold_file(&mut self, path: &Path) -> Option<Folded> {
        let mut reader = match FastqReader::from_path(path, self.encoding) {
            Ok(reader) => reader,
            Err(err) => {
                log::warn!("{}: skipping unreadable file: {}", path.display(), err);
                return None;
            }
        };

        let first = match reader.next() {
            Some(Ok(record)) => record,
            Some(Err(_)) => {
                // Violation details were already logged by the reader.
                log::warn!("{}: skipping malformed file", path.display());
                return None;
            }
            None => {
                log::warn!("{}: skipping file with no records", path.display());
                return None;
            }
        };
        // Release the handle before the metrics pass reopens the file.
        drop(reader);

        let Some((platform, library)) = self.classifier.library_key(&first.header) else {
            log::warn!("{}: skipping unclassified header '{}'", path.display(), first.header);
            return None;
        };

        let mean = match file_mean_read_length(path, self.encoding) {
            Ok(mean) => mean,
            Err(err) => {
                log::warn!("{}: skipping, no usable metrics: {}", path.display(), err);
                return None;
            }
        };
        let prep = PrepType::infer(platform, mean);

        log::info!(
            "{}: {} ({}), library {}",
            path.display(),
            platform,
            prep,
            library
        );

        let folded = if let Some(sample) = self.samples.get_mut(&library) {
            sample.files.push(path.to_path_buf());
            sample.paired = true;
            if sample.files.len() > 2 {
                log::warn!(
                    "library {} has {} files, expected at most a mate pair",
                    library,
                    sample.files.len()
                );
            }
            Folded::Appended
        } else {
            self.samples
                .insert(library.clone(), Sample::new(&library, platform, prep, path.to_path_buf()));
            Folded::Inserted
        };

        Some(folded)
    }
}

// Tests
#[cfg(test)]
mod tests {
    use std::path::Path;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    fn illumina_new(read_number: u8) -> Vec<u8> {
        format!(
            "@D00468:24:H8ELMADXX:1:1101:1470:2237 {}:N:0:2\nACGTACGT\n+\nIIIIIIII\n",
            read_number
        )
        .into_bytes()
    }

    #[test]
    fn mate_files_merge_into_one_paired_sample() {
        use super::SampleRegistry;
        use crate::PrepType;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "run_1.fastq", &illumina_new(1));
        write_file(dir.path(), "run_2.fastq", &illumina_new(2));

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();

        assert_eq!(samples.len(), 1);
        let sample = &samples["@D00468:24:H8ELMADXX:1:1101:1470:2237 "];
        assert!(sample.paired);
        assert_eq!(sample.files.len(), 2);
        assert_eq!(sample.technology, "Illumina");
        assert_eq!(sample.prep, PrepType::Short);
        assert!(sample.files[0].ends_with("run_1.fastq"));
        assert!(sample.files[1].ends_with("run_2.fastq"));
    }

    #[test]
    fn lone_short_read_file_is_single_end() {
        use super::SampleRegistry;
        use crate::PrepType;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "reads.fq", &illumina_new(1));

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();

        assert_eq!(samples.len(), 1);
        let sample = samples.values().next().unwrap();
        assert!(!sample.paired);
        assert_eq!(sample.files.len(), 1);
        assert_eq!(sample.prep, PrepType::Single);
    }

    #[test]
    fn pacbio_file_is_a_long_read_sample() {
        use super::SampleRegistry;
        use crate::PrepType;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        let seq = "A".repeat(8000);
        let quals = "I".repeat(8000);
        let data = format!(
            "@m160113_152755_42135_c100906712550000001823199104291667_s1_p0/15/0_8000\n{}\n+\n{}\n",
            seq, quals
        );
        write_file(dir.path(), "movie.fastq", data.as_bytes());

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();

        let sample = samples.values().next().unwrap();
        assert_eq!(sample.technology, "Pacbio");
        assert_eq!(sample.prep, PrepType::Long);
        assert_eq!(
            sample.library,
            "@m160113_152755_42135_c100906712550000001823199104291667_s1_p0"
        );
    }

    #[test]
    fn unclassified_and_empty_files_are_excluded() {
        use super::SampleRegistry;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a_unknown.fastq", b"@read1\nACGT\n+\nIIII\n");
        write_file(dir.path(), "b_empty.fastq", b"");
        write_file(dir.path(), "c_good.fastq", &illumina_new(1));

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();

        assert_eq!(samples.len(), 1);
        assert!(samples.values().next().unwrap().files[0].ends_with("c_good.fastq"));
    }

    #[test]
    fn malformed_first_record_excludes_the_file() {
        use super::SampleRegistry;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        // Quality string shorter than the sequence.
        write_file(
            dir.path(),
            "broken.fastq",
            b"@D00468:24:H8ELMADXX:1:1101:1470:2237 1:N:0:2\nACGTACGT\n+\nIII\n",
        );

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn non_candidate_files_are_ignored() {
        use super::discover;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "reads.fastq", b"");
        write_file(dir.path(), "reads.fq.gz", b"");
        write_file(dir.path(), "reads.fastq.gz", b"");
        write_file(dir.path(), "notes.txt", b"");
        write_file(dir.path(), "contigs.fasta", b"");

        let files = discover(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|path| path.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert_eq!(names, vec!["reads.fastq", "reads.fastq.gz", "reads.fq.gz"]);
    }

    #[test]
    fn missing_directory_is_fatal() {
        use super::SampleRegistry;
        use crate::reader::Encoding;

        let got = SampleRegistry::new(Encoding::Phred33).build(Path::new("/no/such/dir"));
        assert!(got.is_err());
    }

    #[test]
    fn third_file_with_a_shared_key_is_appended() {
        use super::SampleRegistry;
        use crate::reader::Encoding;

        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "run_1.fastq", &illumina_new(1));
        write_file(dir.path(), "run_2.fastq", &illumina_new(2));
        write_file(dir.path(), "run_3.fastq", &illumina_new(1));

        let samples = SampleRegistry::new(Encoding::Phred33).build(dir.path()).unwrap();

        let sample = samples.values().next().unwrap();
        assert!(sample.paired);
        assert_eq!(sample.files.len(), 3);
    }
}
