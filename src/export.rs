//! Export: deterministic cluster → URL grouping, serialized to disk.
//!
//! Each run writes one fresh `clusters-<k>-<unix_ts>.json` file containing
//! `{"<cluster_id>": ["<url>", ...], ...}` with keys in ascending numeric
//! order and URLs in input order within each group. There is no merging with
//! prior runs, and a cluster id with zero members is simply absent.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::ingest::Dataset;

/// Group URLs under their assigned cluster label.
///
/// `BTreeMap<usize, _>` keeps the keys numerically ordered, which carries
/// straight through serialization: JSON object keys come out as `"0"`, `"1"`,
/// ... ascending. Within each group the dataset's input order is preserved.
pub fn group_by_cluster(data: &Dataset, labels: &[usize]) -> BTreeMap<usize, Vec<String>> {
    debug_assert_eq!(labels.len(), data.len());

    let mut groups: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for (url, &label) in data.urls().zip(labels) {
        groups.entry(label).or_default().push(url.to_string());
    }
    groups
}

/// Export filename for a given cluster count and Unix timestamp.
pub fn export_filename(k: usize, unix_ts: u64) -> String {
    format!("clusters-{k}-{unix_ts}.json")
}

/// Write the cluster export into `dir` and return the file's path.
///
/// The filename embeds the current Unix timestamp, so separate invocations
/// (at second-level granularity) never collide and never overwrite.
pub fn write_export(dir: &Path, data: &Dataset, labels: &[usize], k: usize) -> Result<PathBuf> {
    let unix_ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    let path = dir.join(export_filename(k, unix_ts));
    let groups = group_by_cluster(data, labels);

    let file = File::create(&path)?;
    // serde_json's pretty printer indents with 2 spaces.
    serde_json::to_writer_pretty(BufWriter::new(file), &groups)
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::Record;

    fn dataset(urls: &[&str]) -> Dataset {
        let records = urls
            .iter()
            .map(|url| Record {
                url: url.to_string(),
                vector: vec![0.0],
            })
            .collect();
        Dataset::from_records(records).unwrap()
    }

    #[test]
    fn test_grouping_preserves_input_order() {
        let data = dataset(&["a", "b", "c", "d"]);
        let groups = group_by_cluster(&data, &[1, 0, 1, 0]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&0], vec!["b", "d"]);
        assert_eq!(groups[&1], vec!["a", "c"]);
    }

    #[test]
    fn test_empty_clusters_absent() {
        let data = dataset(&["a", "b"]);
        // Labels 0 and 3 observed; 1 and 2 never assigned.
        let groups = group_by_cluster(&data, &[3, 0]);

        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![0, 3]);
    }

    #[test]
    fn test_every_url_exactly_once() {
        let data = dataset(&["a", "b", "c", "d", "e"]);
        let groups = group_by_cluster(&data, &[2, 0, 2, 1, 0]);

        let total: usize = groups.values().map(Vec::len).sum();
        assert_eq!(total, 5);

        let mut all: Vec<&str> = groups
            .values()
            .flat_map(|g| g.iter().map(String::as_str))
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(8, 1724500000), "clusters-8-1724500000.json");
        assert_eq!(export_filename(1, 0), "clusters-1-0.json");
    }

    #[test]
    fn test_write_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let data = dataset(&["a", "b", "c"]);

        let path = write_export(dir.path(), &data, &[1, 0, 1], 2).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("clusters-2-"));

        let content = std::fs::read_to_string(&path).unwrap();
        // 2-space pretty printing.
        assert!(content.contains("\n  \"0\""));

        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["0"], vec!["b"]);
        assert_eq!(parsed["1"], vec!["a", "c"]);
    }

    #[test]
    fn test_serialized_keys_ascend() {
        let data = dataset(&["a", "b", "c"]);
        let groups = group_by_cluster(&data, &[2, 0, 1]);
        let json = serde_json::to_string(&groups).unwrap();

        let p0 = json.find("\"0\"").unwrap();
        let p1 = json.find("\"1\"").unwrap();
        let p2 = json.find("\"2\"").unwrap();
        assert!(p0 < p1 && p1 < p2);
    }
}
