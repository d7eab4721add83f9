use anyhow::{anyhow, Context, Result};
use arrow::{
    array::{Array, ArrayRef, BooleanArray, StringArray},
    compute::{cast, filter_record_batch},
    csv::WriterBuilder,
    datatypes::{DataType, Field, Schema},
    error::ArrowError,
    record_batch::{RecordBatch, RecordBatchOptions},
};
use std::{cmp::Ordering, collections::BTreeSet, sync::Arc};

/// How distinct values are ordered when offered as filter options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrder {
    /// Plain byte-wise ordering of the text.
    Lexicographic,
    /// Numeric when both sides parse as finite numbers, numbers before text,
    /// text lexicographic.
    Natural,
}

/// An immutable record table where every column is nullable `Utf8`.
#[derive(Debug, Clone)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Wrap a batch, coercing every non-text column to `Utf8`.
    pub fn from_batch(batch: RecordBatch) -> Result<Self, ArrowError> {
        let schema = batch.schema();
        let mut fields = Vec::with_capacity(schema.fields().len());
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());

        for (field, column) in schema.fields().iter().zip(batch.columns()) {
            let column = if column.data_type() == &DataType::Utf8 {
                column.clone()
            } else {
                cast(column, &DataType::Utf8)?
            };
            fields.push(Field::new(field.name(), DataType::Utf8, true));
            columns.push(column);
        }

        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)?;
        Ok(Self { batch })
    }

    /// Build a table from header names and rows of optional cells.
    /// Short rows are padded with missing cells; extra cells are ignored.
    pub fn from_rows(headers: &[&str], rows: &[Vec<Option<&str>>]) -> Result<Self> {
        let fields: Vec<Field> = headers
            .iter()
            .map(|h| Field::new(*h, DataType::Utf8, true))
            .collect();
        let columns: Vec<ArrayRef> = (0..headers.len())
            .map(|i| {
                let cells: Vec<Option<&str>> =
                    rows.iter().map(|row| row.get(i).copied().flatten()).collect();
                Arc::new(StringArray::from(cells)) as ArrayRef
            })
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(rows.len()));
        let batch =
            RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), columns, &options)
                .context("building table from rows")?;
        Ok(Self { batch })
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<String> {
        self.batch
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.batch.schema().index_of(name).is_ok()
    }

    /// The text column called `name`, if present.
    pub fn column(&self, name: &str) -> Option<&StringArray> {
        let idx = self.batch.schema().index_of(name).ok()?;
        self.batch
            .column(idx)
            .as_any()
            .downcast_ref::<StringArray>()
    }

    /// Distinct non-missing values of `name`, sorted by `order`.
    /// `None` when the column is absent.
    pub fn distinct(&self, name: &str, order: ValueOrder) -> Option<Vec<String>> {
        let column = self.column(name)?;
        let set: BTreeSet<&str> = column.iter().flatten().collect();
        let mut values: Vec<String> = set.into_iter().map(str::to_string).collect();
        if order == ValueOrder::Natural {
            values.sort_by(|a, b| natural_cmp(a, b));
        }
        Some(values)
    }

    /// Rows whose `name` cell equals `value` exactly.
    pub fn filter_eq(&self, name: &str, value: &str) -> Result<Table> {
        let column = self
            .column(name)
            .ok_or_else(|| anyhow!("no text column named `{}`", name))?;
        let mask: BooleanArray = column
            .iter()
            .map(|cell| Some(cell == Some(value)))
            .collect();
        let batch = filter_record_batch(&self.batch, &mask)
            .with_context(|| format!("filtering `{}` = `{}`", name, value))?;
        Ok(Self { batch })
    }

    /// Move the named columns (those present, in the given order) to the front.
    pub fn with_leading_columns(&self, leading: &[&str]) -> Result<Table> {
        let schema = self.batch.schema();
        let mut order: Vec<usize> = Vec::with_capacity(schema.fields().len());
        for name in leading {
            if let Ok(idx) = schema.index_of(name) {
                if !order.contains(&idx) {
                    order.push(idx);
                }
            }
        }
        for idx in 0..schema.fields().len() {
            if !order.contains(&idx) {
                order.push(idx);
            }
        }
        let batch = self.batch.project(&order).context("reordering columns")?;
        Ok(Self { batch })
    }

    /// Materialise rows for presentation; missing cells are `None`.
    pub fn rows(&self) -> Vec<Vec<Option<String>>> {
        let columns: Vec<&StringArray> = self
            .batch
            .columns()
            .iter()
            .filter_map(|c| c.as_any().downcast_ref::<StringArray>())
            .collect();
        (0..self.batch.num_rows())
            .map(|r| {
                columns
                    .iter()
                    .map(|c| c.is_valid(r).then(|| c.value(r).to_string()))
                    .collect()
            })
            .collect()
    }

    /// Serialise as CSV with a header row; missing cells become empty fields.
    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
        writer.write(&self.batch).context("writing CSV")?;
        Ok(writer.into_inner())
    }
}

fn as_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn natural_cmp(a: &str, b: &str) -> Ordering {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x
            .partial_cmp(&y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;

    fn sample() -> Table {
        Table::from_rows(
            &["id", "ward", "note"],
            &[
                vec![Some("3"), Some("10"), None],
                vec![Some("1"), Some("2"), Some("a")],
                vec![Some("2"), Some("2"), Some("b")],
                vec![Some("10"), None, Some("c")],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_distinct_lexicographic_drops_missing() {
        let t = sample();
        assert_eq!(
            t.distinct("ward", ValueOrder::Lexicographic).unwrap(),
            vec!["10", "2"]
        );
        assert_eq!(
            t.distinct("id", ValueOrder::Lexicographic).unwrap(),
            vec!["1", "10", "2", "3"]
        );
        assert!(t.distinct("missing", ValueOrder::Lexicographic).is_none());
    }

    #[test]
    fn test_distinct_natural_orders_numbers_by_value() {
        let t = Table::from_rows(
            &["ward"],
            &[
                vec![Some("10")],
                vec![Some("9")],
                vec![Some("ka")],
                vec![Some("1")],
            ],
        )
        .unwrap();
        assert_eq!(
            t.distinct("ward", ValueOrder::Natural).unwrap(),
            vec!["1", "9", "10", "ka"]
        );
    }

    #[test]
    fn test_filter_eq_is_exact() {
        let t = sample();
        let f = t.filter_eq("ward", "2").unwrap();
        assert_eq!(f.num_rows(), 2);
        assert_eq!(f.filter_eq("ward", " 2").unwrap().num_rows(), 0);
        assert!(t.filter_eq("nope", "2").is_err());
    }

    #[test]
    fn test_with_leading_columns_keeps_rest_in_order() {
        let t = sample();
        let r = t.with_leading_columns(&["note", "absent", "id"]).unwrap();
        assert_eq!(r.column_names(), vec!["note", "id", "ward"]);
        assert_eq!(r.num_rows(), t.num_rows());
    }

    #[test]
    fn test_rows_and_csv() {
        let t = sample().filter_eq("id", "3").unwrap();
        assert_eq!(
            t.rows(),
            vec![vec![Some("3".to_string()), Some("10".to_string()), None]]
        );
        let csv = String::from_utf8(t.to_csv().unwrap()).unwrap();
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec!["id,ward,note", "3,10,"]);
    }

    #[test]
    fn test_from_batch_coerces_to_text() {
        let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, true)]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(Int64Array::from(vec![Some(7), None])) as ArrayRef],
        )
        .unwrap();
        let t = Table::from_batch(batch).unwrap();
        assert_eq!(t.distinct("n", ValueOrder::Lexicographic).unwrap(), vec!["7"]);
        assert_eq!(t.num_rows(), 2);
    }
}
