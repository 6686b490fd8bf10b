use std::{fs::File, io::Write, path::Path};

use libthc::{count_and_write, count_hashtags, reduce, Config, CountTable, ALL_KEY};
use zip::{write::SimpleFileOptions, CompressionMethod, ZipWriter};

fn write_zip(path: &Path, members: &[(&str, &str)]) {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in members {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn config(hashtags: &[&str]) -> Config {
    Config {
        hashtags: hashtags.iter().map(|&s| s.to_owned()).collect(),
        ..Config::default()
    }
}

fn read_table(path: &Path) -> CountTable {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

const DAY_ONE: &str = r##"{"lang":"en","text":"i have a #cough today","place":{"country_code":"US"}}
{"lang":"es","text":"#Covid19 y #TOS","place":{"country_code":"MX"}}
not json at all
{"text":"#cough without language","place":{"country_code":"US"}}
{"lang":"en","text":"#cough #covid19"}
"##;

const DAY_TWO: &str = r##"{"lang":"ja","text":"#コロナウイルス","place":{"country_code":"JP"}}
{"lang":"en"}
"##;

#[test]
fn directory_run_skips_noise_and_counts_everything_else() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("geoTwitter20-03-01");
    std::fs::create_dir(&input).unwrap();

    write_zip(
        &input.join("geoTwitter20-03-01-a.zip"),
        &[("part-0", DAY_ONE), ("part-1", DAY_TWO)],
    );
    std::fs::write(input.join("geoTwitter20-03-01-b.zip"), b"PK broken").unwrap();
    write_zip(&input.join("geoTwitter20-03-01-c.zip"), &[("part-0", DAY_TWO)]);
    // Not an archive by name, never opened.
    write_zip(&input.join("unrelated.zip"), &[("part-0", DAY_ONE)]);

    let output_dir = dir.path().join("outputs");
    let (compilation, paths) = count_and_write(
        &input,
        &output_dir,
        &config(&["#cough", "#COVID19", "#コロナウイルス"]),
    )
    .unwrap();

    assert_eq!(compilation.archives.len(), 3);
    assert_eq!(compilation.summary.archives_scanned, 2);
    assert_eq!(compilation.summary.archives_skipped, 1);
    assert_eq!(paths.language, output_dir.join("geoTwitter20-03-01.lang"));
    assert_eq!(paths.country, output_dir.join("geoTwitter20-03-01.country"));

    let lang = read_table(&paths.language);
    assert_eq!(lang.get(ALL_KEY, "en"), 4);
    assert_eq!(lang.get(ALL_KEY, "es"), 1);
    assert_eq!(lang.get(ALL_KEY, "ja"), 2);
    assert_eq!(lang.get("#cough", "en"), 2);
    assert_eq!(lang.get("#covid19", "es"), 1);
    assert_eq!(lang.get("#covid19", "en"), 1);
    assert_eq!(lang.get("#コロナウイルス", "ja"), 2);
    assert_eq!(lang.total("#cough"), 2);

    let country = read_table(&paths.country);
    assert_eq!(country.get("#cough", "US"), 1);
    assert_eq!(country.get("#cough", "__unknown__"), 1);
    assert_eq!(country.get(ALL_KEY, "__unknown__"), 3);
    assert_eq!(country.get(ALL_KEY, "JP"), 2);
    assert_eq!(country.total(ALL_KEY), lang.total(ALL_KEY));
}

#[test]
fn broken_member_does_not_stop_later_members_or_archives() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("geoTwitter20-03-02-a.zip");
    write_zip(
        &first,
        &[
            ("bad", r##"{"lang":"xx","text":"#flu"}"##),
            ("good", r##"{"lang":"en","text":"#flu"}"##),
        ],
    );
    let mut bytes = std::fs::read(&first).unwrap();
    bytes[..4].copy_from_slice(b"XXXX");
    std::fs::write(&first, bytes).unwrap();
    write_zip(
        &dir.path().join("geoTwitter20-03-02-b.zip"),
        &[("good", r##"{"lang":"en","text":"#flu"}"##)],
    );

    let compilation = count_hashtags(dir.path(), &config(&["#flu"])).unwrap();
    assert_eq!(compilation.summary.members_skipped, 1);
    assert_eq!(compilation.counts.by_language.get("#flu", "en"), 2);
    assert_eq!(compilation.counts.by_language.get(ALL_KEY, "en"), 2);
}

#[test]
fn repeated_runs_write_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("geoTwitter20-03-03.zip");
    write_zip(&archive, &[("part-0", DAY_ONE), ("part-1", DAY_TWO)]);

    let config = Config::default();
    let (_, first) = count_and_write(&archive, dir.path().join("one"), &config).unwrap();
    let (_, second) = count_and_write(&archive, dir.path().join("two"), &config).unwrap();
    assert_eq!(
        std::fs::read(&first.language).unwrap(),
        std::fs::read(&second.language).unwrap()
    );
    assert_eq!(
        std::fs::read(&first.country).unwrap(),
        std::fs::read(&second.country).unwrap()
    );
    assert_eq!(
        first.language.file_name().and_then(|name| name.to_str()),
        Some("geoTwitter20-03-03.zip.lang")
    );
}

#[test]
fn counted_days_reduce_into_a_series() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = dir.path().join("outputs");
    for day in ["geoTwitter20-03-01.zip", "geoTwitter20-03-03.zip"] {
        let archive = dir.path().join(day);
        write_zip(&archive, &[("part-0", DAY_ONE)]);
        count_and_write(&archive, &outputs, &config(&["#cough"])).unwrap();
    }

    let hashtags = vec!["#cough".to_owned()];
    let series = reduce::reduce_daily(&outputs, &hashtags, Some(2020), reduce::Table::Language)
        .unwrap();
    assert_eq!(series.files_scanned, 2);
    assert_eq!(series.series("#cough"), Some(&[2, 0, 2][..]));
}
