//! Read gene expression records from delimited tabular text
//!
//! One record per line; the gene id and value columns, the field separator,
//! an optional header line, and an optional leading comment marker are all
//! configurable, covering the usual exports (CSV, TSV, quoted spreadsheet
//! dumps) without a dedicated parser per source.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use derive_builder::Builder;
use thiserror::Error;

/// Layout of a delimited expression table
#[derive(Builder, Clone, Debug)]
pub struct TableFormat {
    /// Field separator
    #[builder(default = "','")]
    pub separator: char,
    /// Zero-based column holding the gene identifier
    #[builder(default = "0")]
    pub gene_column: usize,
    /// Zero-based column holding the expression value
    #[builder(default = "1")]
    pub value_column: usize,
    /// Whether the first line is a header to skip
    #[builder(default = "false")]
    pub has_header: bool,
    /// Lines starting with this marker are ignored
    #[builder(default = "Some('#')")]
    pub comment: Option<char>,
}

impl Default for TableFormat {
    fn default() -> Self {
        TableFormatBuilder::default().build().unwrap()
    }
}

/// Enum representing expression table ingestion failures
///
/// Any of these aborts the whole run: an expression map built from a
/// partially read table cannot be normalized safely.
#[derive(Debug, Error)]
pub enum ExpressionTableError {
    #[error("unable to read expression table")]
    Io(#[from] std::io::Error),
    /// A record has fewer fields than the configured column index requires
    #[error("line {line}: no column {column} in record")]
    MissingColumn { line: usize, column: usize },
    /// The value field is not numeric
    #[error("line {line}: cannot parse expression value `{value}`")]
    InvalidValue { line: usize, value: String },
}

/// Read raw `(gene id, value)` records from a file
///
/// The records are unscaled; pass them to
/// [`ExpressionMap::from_records`](crate::eflux::ExpressionMap::from_records)
/// for universe filtering and normalization.
pub fn read_expression_table<P: AsRef<Path>>(
    path: P,
    format: &TableFormat,
) -> Result<Vec<(String, f64)>, ExpressionTableError> {
    let file = File::open(path)?;
    parse_expression_table(BufReader::new(file), format)
}

/// Parse `(gene id, value)` records from any buffered reader
pub fn parse_expression_table<R: BufRead>(
    reader: R,
    format: &TableFormat,
) -> Result<Vec<(String, f64)>, ExpressionTableError> {
    let mut records = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if format.has_header && number == 0 {
            continue;
        }
        if let Some(marker) = format.comment {
            if line.starts_with(marker) {
                continue;
            }
        }
        if line.trim().is_empty() {
            continue;
        }
        // Quoting characters are stripped before splitting
        let line = line.replace('"', "");
        let fields: Vec<&str> = line.split(format.separator).collect();

        let gene = field(&fields, format.gene_column, number)?;
        let raw_value = field(&fields, format.value_column, number)?;
        let value: f64 =
            raw_value
                .trim()
                .parse()
                .map_err(|_| ExpressionTableError::InvalidValue {
                    line: number + 1,
                    value: raw_value.to_string(),
                })?;
        records.push((gene.trim().to_string(), value));
    }

    Ok(records)
}

fn field<'l>(
    fields: &[&'l str],
    column: usize,
    number: usize,
) -> Result<&'l str, ExpressionTableError> {
    fields
        .get(column)
        .copied()
        .ok_or(ExpressionTableError::MissingColumn {
            line: number + 1,
            column,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_simple_csv() {
        let data = "g1,1.5\ng2,2.25\n";
        let records = parse_expression_table(Cursor::new(data), &TableFormat::default()).unwrap();
        assert_eq!(
            records,
            vec![("g1".to_string(), 1.5), ("g2".to_string(), 2.25)]
        );
    }

    #[test]
    fn skips_header_and_comments() {
        let data = "gene,tpm\n# platform notes\ng1,3.0\n";
        let format = TableFormatBuilder::default()
            .has_header(true)
            .build()
            .unwrap();
        let records = parse_expression_table(Cursor::new(data), &format).unwrap();
        assert_eq!(records, vec![("g1".to_string(), 3.0)]);
    }

    #[test]
    fn strips_quotes_before_splitting() {
        let data = "\"g1\",\"1.5\"\n";
        let records = parse_expression_table(Cursor::new(data), &TableFormat::default()).unwrap();
        assert_eq!(records, vec![("g1".to_string(), 1.5)]);
    }

    #[test]
    fn custom_layout() {
        // Tab separated, value before id, underscore comments
        let data = "_ platform line\n7.5\tg1\n0.5\tg2\n";
        let format = TableFormatBuilder::default()
            .separator('\t')
            .gene_column(1)
            .value_column(0)
            .comment(Some('_'))
            .build()
            .unwrap();
        let records = parse_expression_table(Cursor::new(data), &format).unwrap();
        assert_eq!(
            records,
            vec![("g1".to_string(), 7.5), ("g2".to_string(), 0.5)]
        );
    }

    #[test]
    fn duplicate_ids_are_preserved_in_order() {
        // Overwrite semantics belong to ExpressionMap::from_records
        let data = "g1,1.0\ng1,2.0\n";
        let records = parse_expression_table(Cursor::new(data), &TableFormat::default()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn bad_value_is_a_hard_error() {
        let data = "g1,not_a_number\n";
        let err =
            parse_expression_table(Cursor::new(data), &TableFormat::default()).unwrap_err();
        match err {
            ExpressionTableError::InvalidValue { line, value } => {
                assert_eq!(line, 1);
                assert_eq!(value, "not_a_number");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_a_hard_error() {
        let data = "g1\n";
        let err =
            parse_expression_table(Cursor::new(data), &TableFormat::default()).unwrap_err();
        match err {
            ExpressionTableError::MissingColumn { line, column } => {
                assert_eq!(line, 1);
                assert_eq!(column, 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
