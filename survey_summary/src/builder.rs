use crate::model::SummaryErrors;
use crate::table::{Cell, Column, RawTable};

/// A builder for assembling response tables, row by row or file by file.
///
/// ```
/// use survey_summary::builder::TableBuilder;
/// use survey_summary::{classify_all, summarize, SummaryErrors};
///
/// let mut builder = TableBuilder::with_headers(&["Timestamp".to_string(), "Rate the course".to_string()])?;
///
/// builder.add_row_text(&["2024-05-01 10:00:00", "4"])?;
/// builder.add_row_text(&["2024-05-01 10:05:00", "5"])?;
///
/// let table = builder.build()?;
/// let questions = classify_all(&table, 1)?;
/// let summaries = summarize(&table, &questions);
/// assert_eq!(summaries.len(), 1);
///
/// # Ok::<(), SummaryErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    pub(crate) _names: Vec<String>,
    pub(crate) _columns: Vec<Vec<Cell>>,
    pub(crate) _num_rows: usize,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn with_headers(headers: &[String]) -> Result<TableBuilder, SummaryErrors> {
        let mut builder = TableBuilder::new();
        for h in headers {
            if builder._names.contains(h) {
                return Err(SummaryErrors::DuplicateColumn(h.clone()));
            }
            builder._names.push(h.clone());
            builder._columns.push(Vec::new());
        }
        Ok(builder)
    }

    pub fn num_rows(&self) -> usize {
        self._num_rows
    }

    /// Adds the answers of one respondent.
    ///
    /// A row shorter than the header is completed with missing values.
    pub fn add_row(&mut self, cells: Vec<Cell>) -> Result<(), SummaryErrors> {
        if cells.len() > self._names.len() {
            return Err(SummaryErrors::RowTooLong {
                expected: self._names.len(),
                found: cells.len(),
            });
        }
        let mut cells = cells.into_iter();
        for col in self._columns.iter_mut() {
            col.push(cells.next().unwrap_or(Cell::Empty));
        }
        self._num_rows += 1;
        Ok(())
    }

    /// Adds a row of text answers. Empty strings are missing answers.
    pub fn add_row_text(&mut self, values: &[&str]) -> Result<(), SummaryErrors> {
        let cells = values
            .iter()
            .map(|s| if s.is_empty() { Cell::Empty } else { Cell::text(s) })
            .collect();
        self.add_row(cells)
    }

    /// Appends all the rows of another table below the current rows.
    ///
    /// Columns are matched by name. A column that is only present on one side is
    /// filled with missing values on the other side.
    pub fn append(&mut self, table: &RawTable) {
        for col in table.columns() {
            if !self._names.contains(&col.name) {
                self._names.push(col.name.clone());
                self._columns.push(vec![Cell::Empty; self._num_rows]);
            }
        }
        for (name, cells) in self._names.iter().zip(self._columns.iter_mut()) {
            match table.column(name) {
                Some(col) => cells.extend(col.cells.iter().cloned()),
                None => cells.extend(std::iter::repeat(Cell::Empty).take(table.num_rows())),
            }
        }
        self._num_rows += table.num_rows();
    }

    pub fn build(self) -> Result<RawTable, SummaryErrors> {
        let columns = self
            ._names
            .into_iter()
            .zip(self._columns)
            .map(|(name, cells)| Column { name, cells })
            .collect();
        RawTable::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pads_short_rows() {
        let mut b = TableBuilder::with_headers(&headers(&["a", "b"])).unwrap();
        b.add_row_text(&["x"]).unwrap();
        assert!(b.add_row_text(&["x", "y", "z"]).is_err());
        let t = b.build().unwrap();
        assert_eq!(t.num_rows(), 1);
        assert_eq!(t.column("b").unwrap().cells, vec![Cell::Empty]);
    }

    #[test]
    fn duplicate_headers() {
        assert!(TableBuilder::with_headers(&headers(&["a", "a"])).is_err());
    }

    #[test]
    fn append_by_name() {
        let mut b1 = TableBuilder::with_headers(&headers(&["t", "q1"])).unwrap();
        b1.add_row_text(&["1", "Так"]).unwrap();
        let t1 = b1.build().unwrap();

        let mut b2 = TableBuilder::with_headers(&headers(&["q2", "t"])).unwrap();
        b2.add_row_text(&["5", "2"]).unwrap();
        b2.add_row_text(&["4", "3"]).unwrap();
        let t2 = b2.build().unwrap();

        let mut merged = TableBuilder::new();
        merged.append(&t1);
        merged.append(&t2);
        let t = merged.build().unwrap();

        assert_eq!(t.column_names(), headers(&["t", "q1", "q2"]));
        assert_eq!(t.num_rows(), 3);
        assert_eq!(
            t.column("t").unwrap().cells,
            vec![Cell::text("1"), Cell::text("2"), Cell::text("3")]
        );
        assert_eq!(
            t.column("q1").unwrap().cells,
            vec![Cell::text("Так"), Cell::Empty, Cell::Empty]
        );
        assert_eq!(
            t.column("q2").unwrap().cells,
            vec![Cell::Empty, Cell::text("5"), Cell::text("4")]
        );
    }
}
