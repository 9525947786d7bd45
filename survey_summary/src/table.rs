use std::collections::HashSet;

use serde::Serialize;

use crate::model::SummaryErrors;

/// The content of one cell of a response sheet.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A cell that the spreadsheet itself flagged as broken (#DIV/0!, #REF!, ...).
    Error(String),
}

/// The error marker of a value that is not available. It is a missing answer.
const NOT_AVAILABLE: &str = "#N/A";

impl Cell {
    pub fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    /// Missing answers do not count as answers at all.
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Float(f) => f.is_nan(),
            Cell::Error(e) => e.trim() == NOT_AVAILABLE,
            _ => false,
        }
    }

    /// The trimmed string form of an answer, or None for a missing answer.
    ///
    /// The error cells other than `#N/A` are answers, written as their marker.
    /// Fails for the infinite numbers, which cannot be counted.
    pub fn normalized(&self) -> Result<Option<String>, SummaryErrors> {
        match self {
            Cell::Float(f) if f.is_infinite() => Err(SummaryErrors::InvalidCell {
                content: format!("{:?}", self),
            }),
            _ => Ok(self.lossy_normalized()),
        }
    }

    /// Same as `normalized`, but the infinite numbers are rendered as text.
    pub fn lossy_normalized(&self) -> Option<String> {
        if self.is_missing() {
            return None;
        }
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.trim().to_string()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(format_float(*f)),
            Cell::Bool(true) => Some("True".to_string()),
            Cell::Bool(false) => Some("False".to_string()),
            Cell::Error(e) => Some(e.trim().to_string()),
        }
    }
}

// Spreadsheets store all the numbers as floats: a 4 on a rating scale must stay "4".
fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: &str, cells: Vec<Cell>) -> Column {
        Column {
            name: name.to_string(),
            cells,
        }
    }

    pub fn count_answers(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_missing()).count()
    }
}

/// The responses: one column per question, one row per respondent.
///
/// Invariant: all the columns have the same length and distinct names.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct RawTable {
    columns: Vec<Column>,
    num_rows: usize,
}

impl RawTable {
    pub fn new(columns: Vec<Column>) -> Result<RawTable, SummaryErrors> {
        let num_rows = columns.first().map(|c| c.cells.len()).unwrap_or(0);
        let mut seen: HashSet<&str> = HashSet::new();
        for c in columns.iter() {
            if !seen.insert(c.name.as_str()) {
                return Err(SummaryErrors::DuplicateColumn(c.name.clone()));
            }
            if c.cells.len() != num_rows {
                return Err(SummaryErrors::RaggedColumn {
                    name: c.name.clone(),
                    expected: num_rows,
                    found: c.cells.len(),
                });
            }
        }
        Ok(RawTable { columns, num_rows })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// A copy of the rows `start..=end` (0-based).
    pub fn slice_rows(&self, start: usize, end: usize) -> Result<RawTable, SummaryErrors> {
        if start > end || end >= self.num_rows {
            return Err(SummaryErrors::RowRangeOutOfBounds {
                start,
                end,
                num_rows: self.num_rows,
            });
        }
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                cells: c.cells[start..=end].to_vec(),
            })
            .collect();
        Ok(RawTable {
            columns,
            num_rows: end - start + 1,
        })
    }

    /// The first rows, for a preview.
    pub fn head(&self, n: usize) -> RawTable {
        let n = n.min(self.num_rows);
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                cells: c.cells[..n].to_vec(),
            })
            .collect();
        RawTable {
            columns,
            num_rows: n,
        }
    }
}
