use std::{io, path::Path};

use anyhow::Context;
use tracing::info;

use super::AccumulatedJobs;

/// Column order of the exported table
pub const CSV_HEADER: [&str; 3] = ["url", "title", "company_info"];


/// Writes `jobs` as CSV with a header row, one row per job in the order they were first seen.
///
/// The header is written even when there are no jobs.
pub fn write_csv<W: io::Write>(jobs: &AccumulatedJobs, writer: W) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for record in jobs.iter() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}


pub fn save_to_csv(jobs: &AccumulatedJobs, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}. Do we have permissions?", path.display()))?;
    write_csv(jobs, io::BufWriter::new(file))
        .with_context(|| format!("Failed to write jobs to {}", path.display()))?;
    info!("Data saved to {}", path.display());
    Ok(())
}
