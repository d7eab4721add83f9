use arrow::{
    compute::concat_batches,
    csv::{reader::Format, ReaderBuilder},
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::{collections::HashSet, io::Cursor, sync::Arc};
use tracing::debug;

use crate::table::Table;

/// Spreadsheet-export artifacts such as `Unnamed: 3` or `Unnamed_3`.
static UNNAMED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Unnamed[:_]?\s*\d+$").expect("static regex should compile"));

/// Parse CSV text (first row is the header) into an all-text table.
///
/// Header names are trimmed, blank headers become `Unnamed: <i>`, duplicates
/// get `.1`, `.2`… suffixes, and every `Unnamed` column is dropped.
/// Short rows are padded with missing cells.
pub fn parse_csv(text: &str) -> Result<Table, ArrowError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(text.as_bytes()), Some(0))?;
    if inferred.fields().is_empty() {
        return Err(ArrowError::CsvError("no header row".to_string()));
    }

    let names = normalize_headers(inferred.fields().iter().map(|f| f.name().as_str()));
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|n| Field::new(n, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_truncated_rows(true)
        .build(Cursor::new(text.as_bytes()))?;
    let batches = reader.collect::<Result<Vec<_>, _>>()?;
    let batch = concat_batches(&schema, &batches)?;

    let keep: Vec<usize> = names
        .iter()
        .enumerate()
        .filter(|(_, n)| !is_unnamed(n))
        .map(|(i, _)| i)
        .collect();
    let dropped = names.len() - keep.len();
    if dropped > 0 {
        debug!(dropped, "dropping unnamed export columns");
    }

    Table::from_batch(batch.project(&keep)?)
}

pub fn is_unnamed(name: &str) -> bool {
    UNNAMED.is_match(name)
}

fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (i, name) in raw.enumerate() {
        let trimmed = name.trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            trimmed.to_string()
        };

        let mut candidate = base.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, n);
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ValueOrder;

    #[test]
    fn test_headers_trimmed_and_unnamed_dropped() {
        let text = " कित्ता नं. ,साविक गा.,वडा नं.,Unnamed: 3,\n101,Ka,1,x,\n102,Kha,2,y,\n";
        let t = parse_csv(text).unwrap();
        assert_eq!(t.column_names(), vec!["कित्ता नं.", "साविक गा.", "वडा नं."]);
        assert_eq!(t.num_rows(), 2);
        assert_eq!(
            t.distinct("कित्ता नं.", ValueOrder::Lexicographic).unwrap(),
            vec!["101", "102"]
        );
    }

    #[test]
    fn test_unnamed_pattern() {
        assert!(is_unnamed("Unnamed: 0"));
        assert!(is_unnamed("Unnamed_12"));
        assert!(is_unnamed("Unnamed 4"));
        assert!(!is_unnamed("Unnamed"));
        assert!(!is_unnamed("Unnamed road"));
        assert!(!is_unnamed("वडा नं."));
    }

    #[test]
    fn test_empty_cells_missing_and_short_rows_padded() {
        let text = "a,b,c\n1,,3\n4\n";
        let t = parse_csv(text).unwrap();
        assert_eq!(t.num_rows(), 2);
        assert_eq!(
            t.rows(),
            vec![
                vec![Some("1".to_string()), None, Some("3".to_string())],
                vec![Some("4".to_string()), None, None],
            ]
        );
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let text = "\u{feff}name,note\n\"Shah, R.\",\"said \"\"hi\"\"\"\n";
        let t = parse_csv(text).unwrap();
        assert_eq!(t.column_names(), vec!["name", "note"]);
        assert_eq!(
            t.rows(),
            vec![vec![
                Some("Shah, R.".to_string()),
                Some("said \"hi\"".to_string())
            ]]
        );
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let t = parse_csv("x,x, x\n1,2,3\n").unwrap();
        assert_eq!(t.column_names(), vec!["x", "x.1", "x.2"]);
    }

    #[test]
    fn test_header_only_and_empty_body() {
        let t = parse_csv("a,b\n").unwrap();
        assert_eq!(t.num_rows(), 0);
        assert_eq!(t.num_columns(), 2);

        assert!(parse_csv("").is_err());
    }

    #[test]
    fn test_long_row_is_an_error() {
        assert!(parse_csv("a,b\n1,2,3\n").is_err());
    }
}
