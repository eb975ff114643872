//! Side-by-side comparison of up to four catalog idioms.
//!
//! Stateless: the selection is owned by the caller and passed in on every call.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::errors::AppError;
use crate::models::IdiomRecord;

/// Maximum number of idioms compared at once.
pub const MAX_SELECTION: usize = 4;

/// Cell text for a dimension the idiom has no value for.
pub const ABSENT: &str = "—";

const MSG_ALREADY_SELECTED: &str = "该成语已在对比列表中";

/// Append `candidate` to the selection.
///
/// Leaves the selection unchanged and fails when the id is already selected or the
/// selection is full.
pub fn add_to_selection(selection: &mut Vec<String>, candidate: &str) -> Result<(), AppError> {
    if selection.iter().any(|id| id == candidate) {
        return Err(AppError::DuplicateSelection(MSG_ALREADY_SELECTED.to_string()));
    }
    if selection.len() >= MAX_SELECTION {
        return Err(AppError::SelectionFull { cap: MAX_SELECTION });
    }
    selection.push(candidate.to_string());
    Ok(())
}

pub fn remove_from_selection(selection: &mut Vec<String>, candidate: &str) {
    selection.retain(|id| id != candidate);
}

/// Compared dimension, in display order.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Word,
    Pinyin,
    Emotion,
    Definition,
    Usage,
    MisuseWarning,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Word,
        Dimension::Pinyin,
        Dimension::Emotion,
        Dimension::Definition,
        Dimension::Usage,
        Dimension::MisuseWarning,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::Word => "成语",
            Dimension::Pinyin => "拼音",
            Dimension::Emotion => "感情色彩",
            Dimension::Definition => "释义",
            Dimension::Usage => "适用语境",
            Dimension::MisuseWarning => "易错点",
        }
    }

    fn render(&self, idiom: &IdiomRecord) -> String {
        match self {
            Dimension::Word => idiom.word.clone(),
            Dimension::Pinyin => idiom.pinyin.clone(),
            Dimension::Emotion => idiom.emotion.label().to_string(),
            Dimension::Definition => idiom.definition.clone(),
            Dimension::Usage => idiom.usage.clone(),
            Dimension::MisuseWarning => idiom
                .misuse_warning
                .clone()
                .unwrap_or_else(|| ABSENT.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonColumn {
    pub id: String,
    pub word: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub dimension: Dimension,
    pub label: String,
    /// One cell per column
    pub cells: Vec<String>,
}

/// Aligned comparison table; columns follow selection order.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonTable {
    pub columns: Vec<ComparisonColumn>,
    pub rows: Vec<ComparisonRow>,
}

/// Build the comparison table for the selected ids.
///
/// Ids the catalog cannot resolve are dropped.
pub fn assemble(selection: &[String], catalog: &Catalog) -> ComparisonTable {
    let idioms: Vec<&IdiomRecord> = selection
        .iter()
        .filter_map(|id| {
            let idiom = catalog.find_by_id(id);
            if idiom.is_none() {
                tracing::debug!("Comparison dropped unknown idiom {}", id);
            }
            idiom
        })
        .collect();

    if idioms.is_empty() {
        return ComparisonTable::default();
    }

    let columns = idioms
        .iter()
        .map(|idiom| ComparisonColumn {
            id: idiom.id.clone(),
            word: idiom.word.clone(),
        })
        .collect();

    let rows = Dimension::ALL
        .iter()
        .map(|dimension| ComparisonRow {
            dimension: *dimension,
            label: dimension.label().to_string(),
            cells: idioms.iter().map(|idiom| dimension.render(idiom)).collect(),
        })
        .collect();

    ComparisonTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_selection_cap() {
        let mut selection = ids(&["cy_001", "cy_002", "cy_003", "cy_004"]);

        let err = add_to_selection(&mut selection, "cy_005").unwrap_err();
        assert_eq!(err, AppError::SelectionFull { cap: 4 });
        assert_eq!(selection.len(), 4);
    }

    #[test]
    fn test_selection_duplicate_guard() {
        let mut selection = ids(&["cy_001", "cy_002"]);

        let err = add_to_selection(&mut selection, "cy_002").unwrap_err();
        assert!(matches!(err, AppError::DuplicateSelection(_)));
        assert_eq!(selection, ids(&["cy_001", "cy_002"]));

        // Duplicate wins over full
        let mut full = ids(&["cy_001", "cy_002", "cy_003", "cy_004"]);
        assert!(matches!(
            add_to_selection(&mut full, "cy_004"),
            Err(AppError::DuplicateSelection(_))
        ));
    }

    #[test]
    fn test_selection_add_and_remove() {
        let mut selection = Vec::new();
        add_to_selection(&mut selection, "cy_009").unwrap();
        add_to_selection(&mut selection, "cy_010").unwrap();
        assert_eq!(selection, ids(&["cy_009", "cy_010"]));

        remove_from_selection(&mut selection, "cy_009");
        remove_from_selection(&mut selection, "cy_404");
        assert_eq!(selection, ids(&["cy_010"]));
    }

    #[test]
    fn test_assemble_aligns_rows_with_selection_order() {
        let catalog = Catalog::bundled().unwrap();

        let table = assemble(&ids(&["cy_004", "cy_003"]), &catalog);

        let columns: Vec<_> = table.columns.iter().map(|c| c.word.as_str()).collect();
        assert_eq!(columns, vec!["无稽之谈", "空穴来风"]);

        let labels: Vec<_> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["成语", "拼音", "感情色彩", "释义", "适用语境", "易错点"]);
        assert!(table.rows.iter().all(|row| row.cells.len() == 2));

        assert_eq!(table.rows[2].cells, vec!["贬义", "中性"]);
        assert_eq!(table.rows[5].cells[0], ABSENT);
        assert!(table.rows[5].cells[1].contains("无稽之谈"));
    }

    #[test]
    fn test_assemble_drops_unknown_ids() {
        let catalog = Catalog::bundled().unwrap();

        let table = assemble(&ids(&["cy_404", "cy_002"]), &catalog);
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.rows[0].cells, vec!["首屈一指"]);
        assert_eq!(table.rows[2].cells, vec!["褒义"]);

        assert!(assemble(&ids(&["cy_404"]), &catalog).columns.is_empty());
        assert!(assemble(&[], &catalog).rows.is_empty());
    }
}
