use std::path::Path;

pub use config::Config;
pub use counts::{CountTable, HashtagCounts, ALL_KEY};
pub use error::{Error, Result};
pub use hashtag_compiler::{Compilation, HashtagCompiler, HashtagCounter};
pub use hashtags::HashtagSet;
pub use output::OutputPaths;
pub use scanner::{ArchiveScanner, ScanSummary};

pub mod config;
pub mod counts;
mod error;
mod hashtag_compiler;
mod hashtags;
pub mod output;
pub mod reduce;
pub mod scanner;
pub mod top;
mod tweet;

pub use tweet::{Place, Tweet};

/// Count hashtags over the archives at `input`, a single archive or a
/// directory of them.
pub fn count_hashtags(input: impl AsRef<Path>, config: &Config) -> Result<Compilation> {
    Ok(HashtagCompiler::from_input(input, config)?.compile())
}

/// Count hashtags and write `<base>.lang` / `<base>.country` into
/// `output_dir`.
pub fn count_and_write(
    input: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &Config,
) -> Result<(Compilation, OutputPaths)> {
    let input = input.as_ref();
    let base_name = output::base_name(input)?;
    let compilation = count_hashtags(input, config)?;
    let paths = output::write_counts(&compilation.counts, output_dir, &base_name)?;
    Ok((compilation, paths))
}
