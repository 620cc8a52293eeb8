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
use std::str::FromStr;

use clap::Parser;

use readprep::metrics::file_mean_read_length;
use readprep::reader::Encoding;
use readprep::reader::FastqReader;
use readprep::registry::SampleRegistry;

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init()
    .unwrap();
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    match &cli.command {
        // Classify
        Some(cli::Commands::Classify {
            indir,
            phred,
            verbose,
        }) => {
            init_log(if *verbose { 3 } else { 2 });

            let encoding = Encoding::from_str(phred).expect("Recognized quality encoding");
            let samples = SampleRegistry::new(encoding)
                .build(indir)
                .expect("Readable input directory");

            samples.values().for_each(|sample| {
                let files = sample
                    .files
                    .iter()
                    .map(|file| file.to_string_lossy().to_string())
                    .collect::<Vec<String>>()
                    .join(",");
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    sample.library, sample.technology, sample.prep, sample.paired, files
                );
            });
        },

        // Check
        Some(cli::Commands::Check {
            input_file,
            phred,
            verbose,
        }) => {
            init_log(if *verbose { 3 } else { 2 });

            let encoding = Encoding::from_str(phred).expect("Recognized quality encoding");
            let mut reader = FastqReader::from_path(input_file, encoding).expect("Readable input file");

            let mut valid = 0_u64;
            let mut failed = false;
            for record in reader.by_ref() {
                match record {
                    Ok(_) => valid += 1,
                    // The reader has already logged the violation.
                    Err(_) => failed = true,
                }
            }
            println!("{}\t{} valid record(s)", input_file.display(), valid);

            if failed {
                std::process::exit(1);
            }
        },

        // Stats
        Some(cli::Commands::Stats {
            input_file,
            phred,
            verbose,
        }) => {
            init_log(if *verbose { 3 } else { 2 });

            let encoding = Encoding::from_str(phred).expect("Recognized quality encoding");
            let mean = file_mean_read_length(input_file, encoding).expect("Valid fastq input");
            println!("{}\t{:.2}", input_file.display(), mean);
        },

        None => { println!("Usage: readprep <COMMAND>, see readprep --help") },
    }
}
