use std::path::PathBuf;

use anyhow::{Context, Result};

use vinostat::data::export::write_file;
use vinostat::data::synthetic::{self, DEFAULT_SAMPLE_COUNT};

/// Usage: `generate_sample [OUTPUT] [COUNT] [SEED]`
///
/// OUTPUT defaults to `wine_sample.csv`; a `.parquet` extension writes Parquet.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output_path = PathBuf::from(args.next().unwrap_or_else(|| "wine_sample.csv".to_string()));
    let count = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid record count '{s}'"))?,
        None => DEFAULT_SAMPLE_COUNT,
    };
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed '{s}'"))?,
        None => 42,
    };

    let dataset = synthetic::generate(count, seed)?;
    write_file(&dataset, &output_path)?;

    println!(
        "Wrote {} wines ({} fields each) to {}",
        dataset.len(),
        dataset.schema().len(),
        output_path.display()
    );
    Ok(())
}
