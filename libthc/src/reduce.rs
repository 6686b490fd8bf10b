//! Per-day series from a folder of count files.
//!
//! Each count file written by a counting run over one day of archives is
//! named after that day (`geoTwitter20-03-15.zip.lang`). Reducing collects the
//! total for each hashtag per day over a continuous range of days, filling
//! gaps with zero.

use std::{
    collections::BTreeMap,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate};
use lazy_regex::regex_captures;
use log::debug;
use walkdir::WalkDir;

use crate::{
    counts::CountTable,
    error::{Error, Result},
    output::{COUNTRY_EXTENSION, LANGUAGE_EXTENSION},
};

/// Which of the two count tables to reduce over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Table {
    #[default]
    Language,
    Country,
}

impl Table {
    pub fn extension(self) -> &'static str {
        match self {
            Table::Language => LANGUAGE_EXTENSION,
            Table::Country => COUNTRY_EXTENSION,
        }
    }
}

/// Date embedded in a file name as `geoTwitterYY-MM-DD`, in the 2000s.
pub fn date_from_name(name: &str) -> Option<NaiveDate> {
    let (_, yy, mm, dd) = regex_captures!(r"geoTwitter(\d{2})-(\d{2})-(\d{2})", name)?;
    NaiveDate::from_ymd_opt(
        2000 + yy.parse::<i32>().ok()?,
        mm.parse().ok()?,
        dd.parse().ok()?,
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySeries {
    pub days: Vec<NaiveDate>,
    /// One value per entry of `days`, keyed by hashtag.
    pub counts: BTreeMap<String, Vec<u64>>,
    /// Hashtags in the order they were requested.
    pub hashtags: Vec<String>,
    pub files_scanned: usize,
}

impl DailySeries {
    pub fn first_day(&self) -> Option<NaiveDate> {
        self.days.first().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.days.last().copied()
    }

    pub fn series(&self, hashtag: &str) -> Option<&[u64]> {
        self.counts.get(hashtag).map(Vec::as_slice)
    }

    pub fn write_csv(&self, writer: impl Write) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["date".to_owned()];
        header.extend(self.hashtags.iter().cloned());
        wtr.write_record(&header)?;

        for (i, day) in self.days.iter().enumerate() {
            let mut row = vec![day.format("%Y-%m-%d").to_string()];
            for hashtag in &self.hashtags {
                let count = self.counts.get(hashtag).map(|s| s[i]).unwrap_or_default();
                row.push(count.to_string());
            }
            wtr.write_record(&row)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

/// Sum every bucket of each hashtag, one count file per day.
///
/// Days with no file, or with a file that doesn't parse, count as zero.
pub fn reduce_daily(
    outputs_dir: impl AsRef<Path>,
    hashtags: &[String],
    year: Option<i32>,
    table: Table,
) -> Result<DailySeries> {
    let outputs_dir = outputs_dir.as_ref();
    if !outputs_dir.is_dir() {
        return Err(Error::NotADirectory(outputs_dir.to_owned()));
    }

    let suffix = format!(".{}", table.extension());
    let mut day_files: BTreeMap<NaiveDate, PathBuf> = BTreeMap::new();
    for (day, path) in dated_files(outputs_dir, &suffix) {
        if year.map(|year| day.year() == year).unwrap_or(true) {
            day_files.insert(day, path);
        }
    }

    let (Some(&start), Some(&end)) = (day_files.keys().next(), day_files.keys().next_back())
    else {
        return Err(Error::NoDailyFiles(outputs_dir.to_owned()));
    };

    let days: Vec<NaiveDate> = start.iter_days().take_while(|day| *day <= end).collect();
    let mut counts: BTreeMap<String, Vec<u64>> = hashtags
        .iter()
        .map(|h| (h.clone(), Vec::with_capacity(days.len())))
        .collect();

    for day in &days {
        let table = day_files.get(day).and_then(|path| load_day(path));
        for (hashtag, series) in counts.iter_mut() {
            series.push(table.as_ref().map(|t| t.total(hashtag)).unwrap_or_default());
        }
    }

    Ok(DailySeries {
        days,
        counts,
        hashtags: hashtags.to_vec(),
        files_scanned: day_files.len(),
    })
}

/// Dated files with the given suffix, in path order so that a later path
/// replaces an earlier one for the same day.
fn dated_files(dir: &Path, suffix: &str) -> Vec<(NaiveDate, PathBuf)> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            if !name.ends_with(suffix) {
                return None;
            }
            let day = date_from_name(name)?;
            Some((day, entry.into_path()))
        })
        .collect()
}

fn load_day(path: &Path) -> Option<CountTable> {
    CountTable::load(path)
        .map_err(|e| debug!("Treating {} as empty: {}", path.display(), e))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_in_names() {
        assert_eq!(
            date_from_name("geoTwitter20-05-01.zip.lang"),
            NaiveDate::from_ymd_opt(2020, 5, 1)
        );
        assert_eq!(
            date_from_name("outputs/geoTwitter21-12-31"),
            NaiveDate::from_ymd_opt(2021, 12, 31)
        );
        assert_eq!(date_from_name("geoTwitter20-02-30.zip.lang"), None);
        assert_eq!(date_from_name("geoTwitter2020-01-01.zip"), None);
        assert_eq!(date_from_name("day.lang"), None);
    }

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn fills_gaps_and_corrupt_days_with_zero() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "geoTwitter20-01-01.zip.lang",
            r##"{"#flu":{"en":2,"es":1},"_all":{"en":10}}"##,
        );
        write(dir.path(), "geoTwitter20-01-03.zip.lang", "{\"#flu\":{\"en\":");
        write(
            dir.path(),
            "geoTwitter20-01-04.zip.lang",
            r##"{"#flu":{"fr":4},"#cough":{"en":1}}"##,
        );
        write(dir.path(), "geoTwitter20-01-09.zip.country", r##"{"#flu":{"US":9}}"##);
        write(dir.path(), "notes.lang", r##"{"#flu":{"US":9}}"##);

        let hashtags = vec!["#flu".to_owned(), "#cough".to_owned()];
        let series = reduce_daily(dir.path(), &hashtags, None, Table::Language).unwrap();
        assert_eq!(series.files_scanned, 3);
        assert_eq!(series.days.len(), 4);
        assert_eq!(series.first_day(), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(series.last_day(), NaiveDate::from_ymd_opt(2020, 1, 4));
        assert_eq!(series.series("#flu"), Some(&[3, 0, 0, 4][..]));
        assert_eq!(series.series("#cough"), Some(&[0, 0, 0, 1][..]));

        let mut out = Vec::new();
        series.write_csv(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "date,#flu,#cough\n\
             2020-01-01,3,0\n\
             2020-01-02,0,0\n\
             2020-01-03,0,0\n\
             2020-01-04,4,1\n"
        );
    }

    #[test]
    fn country_table_and_year_filter() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "geoTwitter20-12-31.zip.country", r##"{"#flu":{"US":1}}"##);
        write(dir.path(), "geoTwitter21-01-01.zip.country", r##"{"#flu":{"US":2,"GB":3}}"##);
        let hashtags = vec!["#flu".to_owned()];

        let series = reduce_daily(dir.path(), &hashtags, Some(2021), Table::Country).unwrap();
        assert_eq!(series.days, vec![NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()]);
        assert_eq!(series.series("#flu"), Some(&[5][..]));

        assert!(matches!(
            reduce_daily(dir.path(), &hashtags, Some(2019), Table::Country),
            Err(Error::NoDailyFiles(_))
        ));
        assert!(matches!(
            reduce_daily(dir.path(), &hashtags, None, Table::Language),
            Err(Error::NoDailyFiles(_))
        ));
    }

    #[test]
    fn missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            reduce_daily(dir.path().join("nope"), &[], None, Table::Language),
            Err(Error::NotADirectory(_))
        ));
    }
}
