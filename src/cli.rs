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
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Group the read files in a directory into samples
    Classify {
        // Directory containing candidate .fastq/.fq(.gz) files
        #[arg(group = "input", required = true, help = "Input directory")]
        indir: PathBuf,

        // Quality encoding of the input files
        #[arg(long = "phred", default_value = "phred33")]
        phred: String,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Validate a single read file record by record
    Check {
        // Input fastq file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Quality encoding of the input file
        #[arg(long = "phred", default_value = "phred33")]
        phred: String,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Report the mean read length of a file
    Stats {
        // Input fastq file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Quality encoding of the input file
        #[arg(long = "phred", default_value = "phred33")]
        phred: String,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
