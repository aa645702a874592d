use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::problem::Problem;
use crate::sampler::Sample;

pub fn load_problems(path: &Path) -> Result<Vec<Problem>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let problems = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse problems from {}", path.display()))?;
    Ok(problems)
}

/// One record list per file, in argument order.
pub fn load_batches(paths: &[impl AsRef<Path>]) -> Result<Vec<Vec<Problem>>> {
    paths.iter().map(|p| load_problems(p.as_ref())).collect()
}

/// Load and concatenate several record files, in argument order.
pub fn load_all(paths: &[impl AsRef<Path>]) -> Result<Vec<Problem>> {
    Ok(load_batches(paths)?.into_iter().flatten().collect())
}

pub fn save_problems(path: &Path, problems: &[Problem]) -> Result<()> {
    write_json(path, problems)
}

pub fn save_sample(path: &Path, sample: &Sample) -> Result<()> {
    write_json(path, sample)
}

/// Four-space indented JSON, one snapshot per call.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    let mut ser =
        serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
