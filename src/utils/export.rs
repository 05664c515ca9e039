//! Result file exporters
//!
//! JSON: pretty-printed (2-space indent), UTF-8 kept as-is.
//! CSV: one row per NFT. The header is computed once from the whole record
//! set (sorted union of keys minus the nested fields) before any row is
//! written, so every row lines up with it.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::models::types::NftRecord;
use crate::utils::constants::CSV_SKIP_KEYS;

/// Write `data` as pretty JSON, replacing any previous file
pub fn save_json<T: Serialize + ?Sized>(data: &T, path: &Path) -> AppResult<()> {
    let json = serde_json::to_string_pretty(data).map_err(|e| AppError::write_failed(path, e))?;
    fs::write(path, json).map_err(|e| AppError::write_failed(path, e))?;
    info!("💾 Saved: {}", path.display());
    Ok(())
}

/// Sorted CSV header for a record set
pub fn csv_columns(rows: &[Map<String, Value>]) -> Vec<String> {
    let keys: BTreeSet<&String> = rows.iter().flat_map(|row| row.keys()).collect();
    keys.into_iter()
        .filter(|key| !CSV_SKIP_KEYS.contains(&key.as_str()))
        .cloned()
        .collect()
}

/// Cell text: strings raw, null/missing empty, everything else as JSON
pub fn csv_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Flat CSV mirror of the NFT list. Returns the number of rows written.
///
/// An empty list still produces an (empty) file.
pub fn export_csv(nfts: &[NftRecord], path: &Path) -> AppResult<usize> {
    let rows: Vec<Map<String, Value>> = nfts.iter().map(NftRecord::to_row).collect();
    let columns = csv_columns(&rows);

    let mut writer = csv::Writer::from_path(path).map_err(|e| AppError::write_failed(path, e))?;

    if !rows.is_empty() {
        writer.write_record(&columns).map_err(|e| AppError::write_failed(path, e))?;
        for row in &rows {
            let record: Vec<String> = columns.iter().map(|column| csv_cell(row.get(column))).collect();
            writer.write_record(&record).map_err(|e| AppError::write_failed(path, e))?;
        }
    }

    writer.flush().map_err(|e| AppError::write_failed(path, e))?;
    info!("📄 Exported {} rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::FailedNft;
    use serde_json::json;

    fn row(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_columns_sorted_union_without_nested() {
        let rows = vec![
            row(json!({ "name": "a", "attributes": [], "trait_Hat": "Cap" })),
            row(json!({ "mintAddress": "m", "rarity": {}, "extra": {}, "error": "x" })),
        ];
        assert_eq!(csv_columns(&rows), vec!["error", "mintAddress", "name", "trait_Hat"]);
    }

    #[test]
    fn test_cells() {
        assert_eq!(csv_cell(None), "");
        assert_eq!(csv_cell(Some(&Value::Null)), "");
        assert_eq!(csv_cell(Some(&json!("Gorbagio #7"))), "Gorbagio #7");
        assert_eq!(csv_cell(Some(&json!(500))), "500");
        assert_eq!(csv_cell(Some(&json!(true))), "true");
        assert_eq!(csv_cell(Some(&json!({ "k": 1 }))), "{\"k\":1}");
    }

    #[test]
    fn test_missing_cells_render_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let nfts = vec![NftRecord::Failed(FailedNft {
            mint_address: "MintZ".into(),
            error: "failed to fetch".into(),
        })];

        assert_eq!(export_csv(&nfts, &path).unwrap(), 1);
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "error,mintAddress\nfailed to fetch,MintZ\n");
    }

    #[test]
    fn test_empty_list_writes_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        assert_eq!(export_csv(&[], &path).unwrap(), 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_json_keeps_unicode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        save_json(&json!({ "name": "Gorbagio ♻️" }), &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Gorbagio ♻️"));
        assert_eq!(text, "{\n  \"name\": \"Gorbagio ♻️\"\n}");
    }
}
