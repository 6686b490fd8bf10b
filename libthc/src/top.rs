use crate::{
    counts::{CountTable, ALL_KEY},
    error::{Error, Result},
};

/// The `limit` largest entries of the `key` bucket, smallest first.
///
/// With `percent`, each value is divided by the matching `_all` count when
/// that count is present and non-zero.
pub fn top_keys(
    table: &CountTable,
    key: &str,
    percent: bool,
    limit: usize,
) -> Result<Vec<(String, f64)>> {
    let bucket = table
        .bucket(key)
        .ok_or_else(|| Error::KeyNotFound(key.to_owned()))?;

    let mut items: Vec<(String, f64)> = bucket
        .iter()
        .map(|(k, &count)| {
            let total = table.get(ALL_KEY, k);
            let value = if percent && total != 0 {
                count as f64 / total as f64
            } else {
                count as f64
            };
            (k.clone(), value)
        })
        .collect();
    items.sort_by(|(ka, a), (kb, b)| a.total_cmp(b).then_with(|| ka.cmp(kb)));

    let skip = items.len().saturating_sub(limit);
    Ok(items.split_off(skip))
}
