//! Reading feature tables from CSV/TSV files with the columns `type`,
//! `description`, `begin`, `end`, `length`, `accession`, `entryName`,
//! `taxid` and `order`. Other columns are ignored.

use crate::{
    error::{LayoutError, LayoutResult},
    feature_table::FeatureTable,
    phospho_sites::ModifiedResidue,
};
use csv::ReaderBuilder;
use protrack_protocol::{FeatureRow, FeatureType};
use serde::Deserialize;
use std::{io::Read, path::Path};
use tracing::debug;

const MODIFIED_RESIDUE_KEY: &str = "MOD_RES";

#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    feature_type: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    begin: String,
    #[serde(default)]
    end: String,
    #[serde(default)]
    length: String,
    #[serde(default)]
    accession: String,
    #[serde(default, rename = "entryName")]
    entry_name: String,
    #[serde(default)]
    taxid: String,
    order: String,
}

#[derive(Debug, Clone)]
pub struct LoadedFeatures {
    pub table: FeatureTable,
    pub modified_residues: Vec<ModifiedResidue>,
}

pub fn read_feature_table(path: &str) -> LayoutResult<LoadedFeatures> {
    let text = std::fs::read_to_string(path)?;
    let delimiter = delimiter_for(path, &text);
    read_feature_table_from_reader(text.as_bytes(), delimiter)
}

pub fn read_feature_table_from_reader<R: Read>(
    reader: R,
    delimiter: u8,
) -> LayoutResult<LoadedFeatures> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = vec![];
    let mut modified_residues = vec![];
    for result in rdr.deserialize() {
        let record: RawRecord = result?;
        let order = parse_order(&record)?;
        let key = record.feature_type.to_ascii_uppercase();
        if key == MODIFIED_RESIDUE_KEY {
            modified_residues.push(ModifiedResidue {
                order,
                begin: parse_coordinate(&key, order, "begin", &record.begin)?,
                description: record.description,
            });
            continue;
        }
        let Some(feature_type) = FeatureType::from_key(&key) else {
            debug!(feature_type = key.as_str(), order, "skipping unsupported feature row");
            continue;
        };
        let length = parse_coordinate(&key, order, "length", &record.length)?
            .ok_or_else(|| LayoutError::invalid_coordinate(&key, order, "missing length"))?;
        rows.push(FeatureRow {
            feature_type,
            begin: parse_coordinate(&key, order, "begin", &record.begin)?,
            end: parse_coordinate(&key, order, "end", &record.end)?,
            length,
            description: record.description,
            accession: record.accession,
            entry_name: record.entry_name,
            taxid: record.taxid,
            order,
        });
    }
    Ok(LoadedFeatures {
        table: FeatureTable::new(rows)?,
        modified_residues,
    })
}

fn delimiter_for(path: &str, text: &str) -> u8 {
    let extension = Path::new(path)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if extension == "tsv" || extension == "tab" {
        return b'\t';
    }
    let header = text.lines().next().unwrap_or_default();
    if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

fn parse_order(record: &RawRecord) -> LayoutResult<u32> {
    let order = record.order.trim().parse::<u32>().map_err(|e| {
        LayoutError::invalid_coordinate(
            &record.feature_type,
            0,
            format!("order '{}' is not a track index: {e}", record.order),
        )
    })?;
    if order == 0 {
        return Err(LayoutError::invalid_coordinate(
            &record.feature_type,
            0,
            "track index must be at least 1",
        ));
    }
    Ok(order)
}

/// Empty and `NA` cells are missing values.
fn parse_coordinate(key: &str, order: u32, column: &str, value: &str) -> LayoutResult<Option<i64>> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("NA") {
        return Ok(None);
    }
    value.parse::<i64>().map(Some).map_err(|e| {
        LayoutError::invalid_coordinate(
            key,
            order,
            format!("{column} '{value}' is not an integer: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CSV: &str = "\
type,description,begin,end,length,accession,entryName,taxid,order
CHAIN,Tyrosine-protein kinase,1,500,500,P00001,KIN_HUMAN,9606,1
DOMAIN,Kinase,50,120,500,P00001,KIN_HUMAN,9606,1
MOD_RES,Phosphotyrosine,88,88,500,P00001,KIN_HUMAN,9606,1
HELIX,,60,70,500,P00001,KIN_HUMAN,9606,1
CHAIN,Ankyrin,1,300,300,P00002,ANK_HUMAN,9606,2
REPEAT,ANK 1,10,40,300,P00002,ANK_HUMAN,9606,2
REGION,Disordered,280,NA,300,P00002,ANK_HUMAN,9606,2
";

    #[test]
    fn reads_rows_and_routes_modified_residues() {
        let loaded = read_feature_table_from_reader(CSV.as_bytes(), b',').unwrap();
        assert_eq!(loaded.table.len(), 5);
        assert_eq!(loaded.table.orders(), vec![1, 2]);
        assert_eq!(
            loaded.modified_residues,
            vec![ModifiedResidue {
                order: 1,
                begin: Some(88),
                description: "Phosphotyrosine".to_string(),
            }]
        );
        let region = loaded.table.rows_of(FeatureType::Region).next().unwrap();
        assert_eq!(region.end, None);
        assert_eq!(loaded.table.chains().next().unwrap().entry_name, "KIN_HUMAN");
    }

    #[test]
    fn tab_separated_file_is_detected() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(CSV.replace(',', "\t").as_bytes()).unwrap();
        let path = file.path().to_string_lossy().to_string();
        let loaded = read_feature_table(&path).unwrap();
        assert_eq!(loaded.table.rows_of(FeatureType::Repeat).count(), 1);
    }

    #[test]
    fn non_numeric_coordinate_is_rejected() {
        let csv = "type,begin,end,length,order\nCHAIN,1,Inf,10,1\n";
        assert!(matches!(
            read_feature_table_from_reader(csv.as_bytes(), b','),
            Err(LayoutError::InvalidCoordinate { order: 1, .. })
        ));
    }

    #[test]
    fn track_zero_is_rejected() {
        let csv = "type,begin,end,length,order\nCHAIN,1,10,10,0\n";
        assert!(matches!(
            read_feature_table_from_reader(csv.as_bytes(), b','),
            Err(LayoutError::InvalidCoordinate { order: 0, .. })
        ));
    }

    #[test]
    fn table_without_chain_is_empty_input() {
        let csv = "type,begin,end,length,order\nDOMAIN,1,5,10,1\n";
        assert!(matches!(
            read_feature_table_from_reader(csv.as_bytes(), b','),
            Err(LayoutError::EmptyInput)
        ));
    }
}
