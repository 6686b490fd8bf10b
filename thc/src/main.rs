use std::{
    fs::OpenOptions,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use libthc::{
    count_and_write,
    reduce::{self, date_from_name, Table},
    top, Config, CountTable,
};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Count hashtags per language and per country in geotagged post
    /// archives.
    Count {
        /// A zip archive, or a directory of `geoTwitter20*.zip` archives.
        #[arg(long)]
        input_path: PathBuf,

        #[arg(long, default_value = "outputs")]
        output_folder: PathBuf,

        /// TOML file with hashtags and archive naming settings.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Hashtag to count, replaces the configured list. Repeatable.
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,
    },

    /// Per-day totals of hashtags across a folder of count files, as CSV.
    Reduce {
        #[arg(long, default_value = "outputs")]
        outputs_dir: PathBuf,

        #[arg(long, num_args = 1.., required = true)]
        hashtags: Vec<String>,

        /// Only use days from this year.
        #[arg(long)]
        year: Option<i32>,

        #[arg(long, value_enum, default_value_t = TableArg::Lang)]
        table: TableArg,

        /// Write CSV here instead of standard output.
        #[arg(long)]
        output_csv: Option<PathBuf>,
    },

    /// Largest buckets of one hashtag in a single count file.
    Top {
        #[arg(long)]
        input_path: PathBuf,

        /// Hashtag or `_all`.
        #[arg(long)]
        key: String,

        /// Divide by the `_all` count of each bucket.
        #[arg(long)]
        percent: bool,

        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableArg {
    Lang,
    Country,
}

impl From<TableArg> for Table {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Lang => Table::Language,
            TableArg::Country => Table::Country,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Count {
            input_path,
            output_folder,
            config,
            hashtags,
        } => {
            let mut config = match config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            if !hashtags.is_empty() {
                config.hashtags = hashtags;
            }
            count(input_path, output_folder, &config)
        }
        Command::Reduce {
            outputs_dir,
            hashtags,
            year,
            table,
            output_csv,
        } => {
            let series = reduce::reduce_daily(&outputs_dir, &hashtags, year, table.into())?;
            match output_csv {
                Some(path) => {
                    let file = OpenOptions::new()
                        .create(true)
                        .truncate(true)
                        .write(true)
                        .open(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    series.write_csv(BufWriter::new(file))?;
                    println!("Saved series: {}", path.display());
                }
                None => series.write_csv(io::stdout().lock())?,
            }
            if let (Some(first), Some(last)) = (series.first_day(), series.last_day()) {
                eprintln!(
                    "Scanned {} daily files from {}, {} hashtags from {} to {}",
                    series.files_scanned,
                    outputs_dir.display(),
                    hashtags.len(),
                    first,
                    last
                );
            }
            Ok(())
        }
        Command::Top {
            input_path,
            key,
            percent,
            limit,
        } => {
            let table = CountTable::load(&input_path)?;
            let entries = top::top_keys(&table, &key, percent, limit)?;
            let mut out = io::stdout().lock();
            writeln!(out, "{} {}", key, if percent { "(percent)" } else { "(count)" })?;
            for (bucket, value) in entries {
                if percent {
                    writeln!(out, "{bucket:16} {value:.6}")?;
                } else {
                    writeln!(out, "{bucket:16} {value}")?;
                }
            }
            Ok(())
        }
    }
}

fn count(input_path: PathBuf, output_folder: PathBuf, config: &Config) -> anyhow::Result<()> {
    let (compilation, paths) = count_and_write(&input_path, &output_folder, config)
        .with_context(|| format!("Counting hashtags in {}", input_path.display()))?;

    let summary = compilation.summary;
    println!(
        "Scanned {} archives ({} skipped), {} members ({} skipped), {} lines",
        summary.archives_scanned,
        summary.archives_skipped,
        summary.members_read,
        summary.members_skipped,
        summary.lines_read
    );
    let dates = compilation
        .archives
        .iter()
        .filter_map(|path| date_from_name(&path.file_name()?.to_string_lossy()))
        .collect::<Vec<_>>();
    if let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) {
        println!("Archives dated {} to {}", first, last);
    }
    println!("Saved {}", paths.language.display());
    println!("Saved {}", paths.country.display());
    Ok(())
}
