use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use chained_buckets::concordance::build_report;
use chained_buckets::hash_table::HashTable;
use chained_buckets::logger::initialize_logger;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the concordance of a text file.
    Build {
        /// One stop word per line.
        #[arg(short, long)]
        stop_words: PathBuf,

        #[arg(short, long)]
        input: PathBuf,

        /// Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Time insert, lookup and remove on random keys.
    Bench {
        #[arg(short, long, default_value_t = 100_000)]
        samples: usize,

        #[arg(short, long, default_value_t = HashTable::<u64, u64>::DEFAULT_CAPACITY)]
        capacity: usize,
    },
}

fn main() -> Result<()> {
    initialize_logger();
    let args: Args = Args::parse();
    match args.command {
        Command::Build {
            stop_words,
            input,
            output,
        } => build(&stop_words, &input, output.as_deref()),
        Command::Bench { samples, capacity } => bench(samples, capacity),
    }
}

fn build(stop_words: &Path, input: &Path, output: Option<&Path>) -> Result<()> {
    let stop_file: File = File::open(stop_words)
        .with_context(|| format!("failed to open stop words {}", stop_words.display()))?;
    let input_file: File =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let table = build_report(BufReader::new(stop_file), BufReader::new(input_file), writer)
        .with_context(|| format!("failed to build concordance of {}", input.display()))?;
    info!("wrote {} words", table.size());
    Ok(())
}

fn filled(samples: &[u64], capacity: usize) -> HashTable<u64, u64> {
    let mut table: HashTable<u64, u64> = HashTable::with_capacity(capacity);
    for &key in samples {
        table.insert(key, key);
    }
    table
}

fn bench(sample_size: usize, capacity: usize) -> Result<()> {
    let samples: Vec<u64> = (0..sample_size).map(|_| rand::random::<u64>()).collect();

    benchmarking::warm_up();

    let insert = benchmarking::measure_function(|measurer| {
        let mut table: HashTable<u64, u64> = HashTable::with_capacity(capacity);
        for &key in &samples {
            measurer.measure(|| table.insert(key, key));
        }
    })
    .map_err(|err| anyhow!("benchmark failed: {:?}", err))?;

    let lookup = benchmarking::measure_function(|measurer| {
        let table: HashTable<u64, u64> = filled(&samples, capacity);
        for key in &samples {
            measurer.measure(|| table.get_item(key).is_ok());
        }
    })
    .map_err(|err| anyhow!("benchmark failed: {:?}", err))?;

    let remove = benchmarking::measure_function(|measurer| {
        let mut table: HashTable<u64, u64> = filled(&samples, capacity);
        for key in &samples {
            measurer.measure(|| table.remove(key).is_ok());
        }
    })
    .map_err(|err| anyhow!("benchmark failed: {:?}", err))?;

    let table: HashTable<u64, u64> = filled(&samples, capacity);
    println!("Initial capacity {} actual capacity {}", capacity, table.capacity());
    println!("Initial entries {} actual entries {}", sample_size, table.size());
    println!("Load factor {}", table.load_factor());
    println!("Avg time to insert {:?}", insert.elapsed());
    println!("Avg time to lookup {:?}", lookup.elapsed());
    println!("Avg time to remove {:?}", remove.elapsed());
    Ok(())
}
