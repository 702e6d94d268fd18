use protrack_protocol::PhosphoSite;
use serde::{Deserialize, Serialize};
use tracing::warn;

const PHOSPHO_MARKER: &str = "Phospho";

/// A modified-residue annotation (UniProt `MOD_RES`), kept out of the
/// feature table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModifiedResidue {
    pub order: u32,
    pub begin: Option<i64>,
    pub description: String,
}

/// Keeps phosphorylated residues ("Phosphoserine", "Phosphotyrosine; by
/// SRC", ...), one site per annotated position, sorted by track and position.
pub fn extract_phospho_sites(residues: &[ModifiedResidue]) -> Vec<PhosphoSite> {
    let mut ret: Vec<PhosphoSite> = residues
        .iter()
        .filter(|residue| residue.description.contains(PHOSPHO_MARKER))
        .filter_map(|residue| match residue.begin {
            Some(begin) => Some(PhosphoSite {
                order: residue.order,
                begin,
            }),
            None => {
                warn!(
                    order = residue.order,
                    description = residue.description.as_str(),
                    "dropping modified residue without a position"
                );
                None
            }
        })
        .collect();
    ret.sort();
    ret.dedup();
    ret
}
