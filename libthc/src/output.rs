use std::{
    fs::OpenOptions,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    counts::{CountTable, HashtagCounts},
    error::{Error, Result},
};

pub const LANGUAGE_EXTENSION: &str = "lang";
pub const COUNTRY_EXTENSION: &str = "country";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub language: PathBuf,
    pub country: PathBuf,
}

/// Name shared by both output files: the directory name for a directory
/// input, the file name otherwise.
pub fn base_name(input: impl AsRef<Path>) -> Result<String> {
    let input = input.as_ref();
    let named = if input.is_dir() {
        input.canonicalize().unwrap_or_else(|_| input.to_owned())
    } else {
        input.to_owned()
    };
    named
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| Error::NoBaseName(input.to_owned()))
}

/// Write `<base>.lang` and `<base>.country` into `output_dir`, creating it
/// when needed.
pub fn write_counts(
    counts: &HashtagCounts,
    output_dir: impl AsRef<Path>,
    base_name: &str,
) -> Result<OutputPaths> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir).map_err(|source| Error::CreateOutputDir {
        path: output_dir.to_owned(),
        source,
    })?;

    let paths = OutputPaths {
        language: output_dir.join(format!("{base_name}.{LANGUAGE_EXTENSION}")),
        country: output_dir.join(format!("{base_name}.{COUNTRY_EXTENSION}")),
    };
    write_table(&counts.by_language, &paths.language)?;
    write_table(&counts.by_country, &paths.country)?;
    Ok(paths)
}

fn write_table(table: &CountTable, path: &Path) -> Result<()> {
    info!("Saving {}", path.display());
    let wrap = |source: std::io::Error| Error::WriteOutput {
        path: path.to_owned(),
        source,
    };
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, table).map_err(|e| wrap(e.into()))?;
    writer.flush().map_err(wrap)
}
