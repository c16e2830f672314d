//! K-mer count tables on disk
//!
//! Two formats are read:
//! - text: one `<kmer> <count>` pair per line, tab or space separated,
//!   blank lines and `#` comments ignored
//! - JSON: a single object mapping k-mer to count (`.json` extension)
//!
//! A k-mer listed more than once has its counts summed in either format.
//! Tables are written as sorted tab-separated text.

use crate::core::data_structures::KmerCounts;
use anyhow::{anyhow, Context, Result};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::fmt;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Read a count table, choosing the format from the file extension
pub fn read_kmer_counts<P: AsRef<Path>>(path: P) -> Result<KmerCounts> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read k-mer table {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        parse_kmer_json(&contents)
    } else {
        parse_kmer_table(&contents)
    };
    let counts = parsed.with_context(|| format!("Invalid k-mer table {}", path.display()))?;

    debug!(
        "Loaded {} distinct k-mers (k={}) from {}",
        counts.len(),
        counts.k(),
        path.display()
    );
    Ok(counts)
}

/// Parse the whitespace-separated text format
pub fn parse_kmer_table(text: &str) -> Result<KmerCounts> {
    let mut entries = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(kmer), Some(count), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(anyhow!(
                "line {}: expected '<kmer> <count>', found '{}'",
                line_no + 1,
                line
            ));
        };

        let count: usize = count
            .parse()
            .with_context(|| format!("line {}: invalid count '{}'", line_no + 1, count))?;
        entries.push((kmer.to_string(), count));
    }

    Ok(KmerCounts::new(entries)?)
}

/// Object entries in document order with repeated keys kept
struct KmerEntries(Vec<(String, usize)>);

impl<'de> Deserialize<'de> for KmerEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = KmerEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of k-mer counts")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<KmerEntries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, usize>()? {
                    entries.push(entry);
                }
                Ok(KmerEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse a JSON object of k-mer to count
pub fn parse_kmer_json(text: &str) -> Result<KmerCounts> {
    let KmerEntries(entries) =
        serde_json::from_str(text).context("expected a JSON object of k-mer counts")?;
    Ok(KmerCounts::new(entries)?)
}

/// Write `counts` as sorted `<kmer>\t<count>` lines
pub fn write_kmer_counts<W: Write>(writer: W, counts: &KmerCounts) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for (kmer, count) in counts.iter() {
        writeln!(writer, "{kmer}\t{count}")?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `counts` to a file at `path`
pub fn write_kmer_counts_to_path<P: AsRef<Path>>(path: P, counts: &KmerCounts) -> Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_kmer_counts(file, counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AssemblyError;
    use tempfile::tempdir;

    #[test]
    fn test_parse_table() {
        let text = "# k=3\nAAT\t1\n\nATG 2\n  TGA\t1  \nAAT 1\n";
        let counts = parse_kmer_table(text).unwrap();

        assert_eq!(counts.k(), 3);
        assert_eq!(counts.get("AAT"), Some(2));
        assert_eq!(counts.get("ATG"), Some(2));
        assert_eq!(counts.total_multiplicity(), 5);
    }

    #[test]
    fn test_parse_errors_report_line() {
        let err = parse_kmer_table("AAT 1\nATG\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = parse_kmer_table("AAT 1\nATG x\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");

        let err = parse_kmer_table("AAT 1 extra\n").unwrap_err();
        assert!(err.to_string().contains("line 1"), "{err}");
    }

    #[test]
    fn test_parse_rejects_invalid_counts() {
        assert!(parse_kmer_table("").is_err());
        assert!(parse_kmer_table("AAT 0\n").is_err());
        assert!(parse_kmer_table("AAT 1\nAATG 1\n").is_err());
    }

    #[test]
    fn test_json_table() {
        let counts = parse_kmer_json(r#"{"AAAA": 3}"#).unwrap();
        assert_eq!(counts.get("AAAA"), Some(3));
        assert!(parse_kmer_json("[1, 2]").is_err());
        assert!(parse_kmer_json(r#"{"AAAA": -1}"#).is_err());
    }

    #[test]
    fn test_duplicate_kmers_summed_in_both_formats() {
        let from_text = parse_kmer_table("AAT 1\nAAT 1\n").unwrap();
        let from_json = parse_kmer_json(r#"{"AAT": 1, "AAT": 1}"#).unwrap();

        assert_eq!(from_text.get("AAT"), Some(2));
        assert_eq!(from_json, from_text);
    }

    #[test]
    fn test_overflowing_counts_rejected() {
        let text = format!("AC {}\nAC 2\n", usize::MAX);
        let err = parse_kmer_table(&text).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AssemblyError>(),
            Some(AssemblyError::MultiplicityOverflow { .. })
        ));

        let json = format!(r#"{{"AC": {}, "AC": 2}}"#, usize::MAX);
        assert!(parse_kmer_json(&json).is_err());
    }

    #[test]
    fn test_write_then_read_file() {
        let counts = KmerCounts::from_sequence("GATTACA", 3).unwrap();
        let temp_dir = tempdir().unwrap();

        let tsv_path = temp_dir.path().join("counts.tsv");
        write_kmer_counts_to_path(&tsv_path, &counts).unwrap();
        assert_eq!(read_kmer_counts(&tsv_path).unwrap(), counts);

        let json_path = temp_dir.path().join("counts.json");
        fs::write(&json_path, serde_json::to_string(&counts).unwrap()).unwrap();
        assert_eq!(read_kmer_counts(&json_path).unwrap(), counts);
    }

    #[test]
    fn test_write_sorted() {
        let counts = KmerCounts::new(vec![("TTA", 1), ("AAC", 2)]).unwrap();
        let mut buffer = Vec::new();
        write_kmer_counts(&mut buffer, &counts).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "AAC\t2\nTTA\t1\n");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = tempdir().unwrap();
        let err = read_kmer_counts(temp_dir.path().join("absent.tsv")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
