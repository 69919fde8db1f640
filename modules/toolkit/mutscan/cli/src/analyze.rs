use std::path::{Path, PathBuf};

use clap::Args;
use eyre::{Result, WrapErr};

use mutscan_io_rs::alignment;
use mutscan_io_rs::fasta::Reference;
use mutscan_io_rs::WriteRecord;
use mutscan_rs::frequency::{self, FrequencyTable};
use mutscan_rs::{enrichment, table, Engine, DEFAULT_BATCH_SIZE};

pub const DATASET1: &str = "mutation_frequencies_dataset1.csv";
pub const DATASET2: &str = "mutation_frequencies_dataset2.csv";
pub const ENRICHMENT: &str = "mutation_enrichment.csv";

#[derive(Args)]
pub struct Analyze {
    /// Reference FASTA file, only the first record is used
    #[arg(long, value_name = "FASTA")]
    reference: PathBuf,

    /// First SAM/BAM file
    #[arg(long, value_name = "SAM")]
    sam1: PathBuf,

    /// Second SAM/BAM file
    #[arg(long, value_name = "SAM")]
    sam2: PathBuf,

    /// Directory to save output tables
    #[arg(long = "results_dir", value_name = "DIR")]
    results_dir: PathBuf,

    /// Number of reads processed in parallel before merging into the global tally
    #[arg(long, value_name = "INT", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Worker threads: 0 = 1, negative values count back from all available
    #[arg(short, long, value_name = "INT", default_value_t = -1, allow_negative_numbers = true)]
    threads: isize,
}

impl Analyze {
    pub fn run(self) -> Result<()> {
        // Fail on unreadable inputs before any work is done
        let reference = Reference::from_path(&self.reference)?;
        let mut readers = Vec::with_capacity(2);
        for path in [&self.sam1, &self.sam2] {
            readers.push((path, alignment::Reader::from_path(path)?));
        }
        std::fs::create_dir_all(&self.results_dir).wrap_err_with(|| {
            format!("Failed to create results directory {}", self.results_dir.display())
        })?;

        let mut engine = Engine::builder()
            .set_batch_size(self.batch_size)?
            .set_threads(self.threads)?
            .build();
        log::info!(
            "Engine ready: batch size {}, {} threads",
            engine.batch_size(),
            engine.threads()
        );

        let mut tables = Vec::with_capacity(readers.len());
        for (path, mut reader) in readers {
            log::info!("Analyzing {}", path.display());
            let counts = engine
                .run(&reference, &mut reader)
                .wrap_err_with(|| format!("Failed to analyze {}", path.display()))?;
            tables.push(frequency::calculate::<f64>(counts.tally(), reference.seq()));
        }
        let enrichment = enrichment::calculate(&tables[0], &tables[1])?;

        save(&self.results_dir.join(DATASET1), &tables[0])?;
        save(&self.results_dir.join(DATASET2), &tables[1])?;
        save(&self.results_dir.join(ENRICHMENT), &enrichment)?;
        Ok(())
    }
}

fn save(path: &Path, data: &FrequencyTable<f64>) -> Result<()> {
    let mut writer = table::Writer::<_, f64>::from_path(path)?;
    writer
        .write_records(data.iter())
        .and_then(|_| writer.finish())
        .wrap_err_with(|| format!("Failed to save {}", path.display()))?;
    log::info!("Saved {}", path.display());
    Ok(())
}
