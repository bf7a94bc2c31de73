//! Declarative field mapping from typed records to template tables

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::path::Path;

use crate::error::ExportError;
use crate::numeric::round_to;

/// One cell of a regulatory template
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    /// Monetary amount, written to two decimals
    Number(f64),
    /// Ratio or factor, written to four decimals
    Ratio(f64),
    Date(NaiveDate),
    /// Not applicable for this row
    Empty,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Number(x) => write!(f, "{:.2}", round_to(*x, 2)),
            FieldValue::Ratio(x) => write!(f, "{:.4}", round_to(*x, 4)),
            FieldValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FieldValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<u16> for FieldValue {
    fn from(value: u16) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

/// A record that exposes named fields to template mappings
pub trait FieldSource {
    /// Value of `name`, or None if the record has no such field
    fn field(&self, name: &str) -> Option<FieldValue>;
}

/// Column layout of one template: (source field, target column) pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSchema {
    pub code: &'static str,
    pub title: &'static str,
    pub mappings: &'static [(&'static str, &'static str)],
}

impl TemplateSchema {
    pub fn columns(&self) -> Vec<&'static str> {
        self.mappings.iter().map(|&(_, target)| target).collect()
    }
}

/// Project records through a schema into a table
///
/// Every record is read through the same mapping list, so a template is
/// fully described by its schema. A mapping that names a field the record
/// type does not expose fails the whole table.
pub fn project<R: FieldSource>(schema: &TemplateSchema, records: &[R]) -> Result<Table, ExportError> {
    let mut rows = Vec::with_capacity(records.len());
    for record in records {
        let row = schema
            .mappings
            .iter()
            .map(|&(source, _)| {
                record.field(source).ok_or(ExportError::UnknownField {
                    template: schema.code,
                    field: source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    debug!("{}: projected {} rows", schema.code, rows.len());

    Ok(Table {
        code: schema.code,
        columns: schema.columns(),
        rows,
    })
}

/// Assembled template, ready to write
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub code: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<FieldValue>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|&c| c == column)
    }

    /// Values of one column, top to bottom
    pub fn column(&self, column: &str) -> Option<Vec<&FieldValue>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: &'static str,
        amount: f64,
    }

    impl FieldSource for Row {
        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(self.name.into()),
                "amount" => Some(self.amount.into()),
                _ => None,
            }
        }
    }

    const SCHEMA: TemplateSchema = TemplateSchema {
        code: "TST 001",
        title: "Test",
        mappings: &[("name", "Name"), ("amount", "Amount")],
    };

    #[test]
    fn test_project_and_write() {
        let rows = [Row { name: "a", amount: 1.004 }, Row { name: "b", amount: 2_500_000.0 }];
        let table = project(&SCHEMA, &rows).unwrap();
        assert_eq!(table.columns, vec!["Name", "Amount"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.column("Name").unwrap(), vec![&FieldValue::from("a"), &FieldValue::from("b")]);

        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "Name,Amount\na,1.00\nb,2500000.00\n");
    }

    #[test]
    fn test_unknown_field() {
        const BAD: TemplateSchema = TemplateSchema {
            code: "TST 002",
            title: "Bad",
            mappings: &[("name", "Name"), ("missing", "Missing")],
        };
        let err = project(&BAD, &[Row { name: "a", amount: 1.0 }]).unwrap_err();
        assert!(matches!(err, ExportError::UnknownField { template: "TST 002", field: "missing" }));

        // No records means no field lookups
        let table = project(&BAD, &[] as &[Row]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.columns.len(), 2);
    }

    #[test]
    fn test_display() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(FieldValue::Date(date).to_string(), "2024-12-31");
        assert_eq!(FieldValue::Ratio(1.23456).to_string(), "1.2346");
        assert_eq!(FieldValue::Integer(2001).to_string(), "2001");
        assert_eq!(FieldValue::Empty.to_string(), "");
    }
}
