use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, Read},
    path::{Path, PathBuf},
};

use chrono::Local;
use log::{info, warn};
use walkdir::WalkDir;
use zip::{result::ZipResult, ZipArchive};

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Where a line came from. Only used for logging.
#[derive(Debug, Clone, Copy)]
pub struct LineSource<'a> {
    pub archive: &'a Path,
    pub member: &'a str,
    pub line_number: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub archives_scanned: u64,
    pub archives_skipped: u64,
    pub members_read: u64,
    pub members_skipped: u64,
    pub lines_read: u64,
}

/// Streams every line of every member of a list of zip archives.
///
/// Unreadable archives and members are logged and skipped, so a scan always
/// runs to the end of its input.
#[derive(Debug, Clone)]
pub struct ArchiveScanner {
    archives: Vec<PathBuf>,
    progress_interval: u64,
}

impl ArchiveScanner {
    pub fn new(archives: Vec<PathBuf>) -> Self {
        Self {
            archives,
            progress_interval: Config::default().progress_interval,
        }
    }

    /// Zero disables line-count progress messages.
    pub fn with_progress_interval(mut self, progress_interval: u64) -> Self {
        self.progress_interval = progress_interval;
        self
    }

    /// A single archive, or the conventionally named archives directly
    /// inside a directory, in file name order.
    pub fn from_input(input: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let input = input.as_ref();
        let archives = if input.is_dir() {
            let archives: Vec<PathBuf> = WalkDir::new(input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|entry| {
                    entry
                        .file_name()
                        .to_str()
                        .map(|name| config.is_archive_name(name))
                        .unwrap_or_default()
                })
                .map(|entry| entry.into_path())
                .collect();
            if archives.is_empty() {
                return Err(Error::NoArchives(input.to_owned()));
            }
            archives
        } else {
            vec![input.to_owned()]
        };
        Ok(Self::new(archives).with_progress_interval(config.progress_interval))
    }

    pub fn archives(&self) -> &[PathBuf] {
        &self.archives
    }

    /// Feed each line, without its line terminator, to `visit`.
    pub fn scan<F>(&self, mut visit: F) -> ScanSummary
    where
        F: FnMut(&[u8], &LineSource<'_>),
    {
        let mut summary = ScanSummary::default();
        for archive in &self.archives {
            info!("Processing archive {}", archive.display());
            match self.scan_archive(archive, &mut summary, &mut visit) {
                Ok(()) => summary.archives_scanned += 1,
                Err(e) => {
                    warn!("Skipping corrupted archive {}: {}", archive.display(), e);
                    summary.archives_skipped += 1;
                }
            }
        }
        summary
    }
}

// Helper methods
impl ArchiveScanner {
    fn scan_archive<F>(&self, path: &Path, summary: &mut ScanSummary, visit: &mut F) -> ZipResult<()>
    where
        F: FnMut(&[u8], &LineSource<'_>),
    {
        let mut archive = open_archive(path)?;
        for index in 0..archive.len() {
            let member = match archive.by_index(index) {
                Ok(member) => member,
                Err(e) => {
                    warn!(
                        "Skipping corrupted member #{} of {}: {}",
                        index,
                        path.display(),
                        e
                    );
                    summary.members_skipped += 1;
                    continue;
                }
            };
            if member.is_dir() {
                continue;
            }
            let name = member.name().to_owned();
            info!("{} {} {}", Local::now(), path.display(), name);

            match self.scan_member(member, path, &name, summary, visit) {
                Ok(()) => summary.members_read += 1,
                Err(e) => {
                    warn!(
                        "Skipping corrupted member {} of {}: {}",
                        name,
                        path.display(),
                        e
                    );
                    summary.members_skipped += 1;
                }
            }
        }
        Ok(())
    }

    fn scan_member<R, F>(
        &self,
        member: R,
        archive: &Path,
        name: &str,
        summary: &mut ScanSummary,
        visit: &mut F,
    ) -> io::Result<()>
    where
        R: Read,
        F: FnMut(&[u8], &LineSource<'_>),
    {
        let mut reader = BufReader::new(member);
        let mut buffer = Vec::new();
        let mut line_number = 0_u64;
        loop {
            buffer.clear();
            if reader.read_until(b'\n', &mut buffer)? == 0 {
                return Ok(());
            }
            line_number += 1;
            summary.lines_read += 1;
            if self.progress_interval > 0 && line_number % self.progress_interval == 0 {
                info!("{} {} lines: {}", Local::now(), name, line_number);
            }

            let source = LineSource {
                archive,
                member: name,
                line_number,
            };
            visit(trim_line_end(&buffer), &source);
        }
    }
}

fn open_archive(path: &Path) -> ZipResult<ZipArchive<File>> {
    let file = OpenOptions::new().read(true).open(path)?;
    ZipArchive::new(file)
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
