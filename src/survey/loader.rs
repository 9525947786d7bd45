use crate::survey::*;

/// All the responses, merged from the input files.
#[derive(PartialEq, Debug, Clone)]
pub struct LoadedData {
    pub table: RawTable,
    pub sources: Vec<String>,
}

impl LoadedData {
    pub fn n_rows(&self) -> usize {
        self.table.num_rows()
    }

    pub fn n_cols(&self) -> usize {
        self.table.num_columns()
    }

    /// The rows that can be selected, numbered as in the spreadsheet.
    ///
    /// Row 1 is the header, so the answers start on row 2. (0, 0) when there is no answer.
    pub fn row_bounds(&self) -> (usize, usize) {
        if self.n_rows() == 0 {
            return (0, 0);
        }
        (2, self.n_rows() + 1)
    }

    /// The responses between two rows (included), numbered as in the spreadsheet.
    pub fn slice_range(&self, from_row: usize, to_row: usize) -> SurveyResult<RawTable> {
        ensure!(from_row <= to_row, InvertedRangeSnafu { from_row, to_row });
        let (min_row, max_row) = self.row_bounds();
        ensure!(
            self.n_rows() > 0 && from_row >= min_row && to_row <= max_row,
            RowRangeSnafu {
                from_row,
                to_row,
                min_row,
                max_row
            }
        );
        self.table
            .slice_rows(from_row - 2, to_row - 2)
            .context(SummarySnafu {})
    }
}

/// Reads all the files and stacks them, matching the columns by name.
pub fn load_sources(sources: &[FileSource]) -> BSurveyResult<LoadedData> {
    if sources.is_empty() {
        return NoInputFilesSnafu {}.fail().map_err(Box::new);
    }
    let mut builder = builder::TableBuilder::new();
    let mut names: Vec<String> = Vec::new();
    for cfs in sources {
        info!("Attempting to read response file {:?}", cfs.file_path);
        let table = match cfs.provider().as_str() {
            "xlsx" | "excel" => io_excel::read_excel_table(&cfs.file_path, cfs)?,
            "csv" => io_csv::read_csv_table(&cfs.file_path)?,
            x => {
                return UnknownProviderSnafu { provider: x }
                    .fail()
                    .map_err(Box::new)
            }
        };
        builder.append(&table);
        names.push(cfs.file_path.clone());
    }
    let table = builder.build().context(SummarySnafu {})?;
    Ok(LoadedData {
        table,
        sources: names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize) -> LoadedData {
        let mut b = builder::TableBuilder::with_headers(&["t".to_string()]).unwrap();
        for i in 0..n {
            b.add_row(vec![Cell::Int(i as i64)]).unwrap();
        }
        LoadedData {
            table: b.build().unwrap(),
            sources: vec![],
        }
    }

    #[test]
    fn bounds() {
        assert_eq!(data(0).row_bounds(), (0, 0));
        assert_eq!(data(1).row_bounds(), (2, 2));
        assert_eq!(data(10).row_bounds(), (2, 11));
    }

    #[test]
    fn slicing() {
        let d = data(10);
        let s = d.slice_range(2, 11).unwrap();
        assert_eq!(s.num_rows(), 10);
        let s = d.slice_range(4, 5).unwrap();
        assert_eq!(s.column("t").unwrap().cells, vec![Cell::Int(2), Cell::Int(3)]);
        assert!(matches!(
            d.slice_range(5, 4),
            Err(SurveyError::InvertedRange { .. })
        ));
        assert!(matches!(
            d.slice_range(1, 4),
            Err(SurveyError::RowRange { .. })
        ));
        assert!(matches!(
            d.slice_range(2, 12),
            Err(SurveyError::RowRange { .. })
        ));
        assert!(matches!(
            data(0).slice_range(0, 0),
            Err(SurveyError::RowRange { .. })
        ));
    }

    #[test]
    fn merge_files() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = dir.path().join("a.csv");
        let p2 = dir.path().join("b.csv");
        fs::write(&p1, "Timestamp,Rate\n1,4\n2,5\n").unwrap();
        fs::write(&p2, "Timestamp,Comment,Rate\n3,ok,3\n").unwrap();
        let sources: Vec<FileSource> = [&p1, &p2]
            .iter()
            .map(|p| FileSource {
                provider: None,
                file_path: p.display().to_string(),
                excel_worksheet_name: None,
            })
            .collect();
        let d = load_sources(&sources).unwrap();
        assert_eq!(d.n_rows(), 3);
        assert_eq!(d.table.column_names(), vec!["Timestamp", "Rate", "Comment"]);
        assert_eq!(
            d.table.column("Rate").unwrap().cells,
            vec![Cell::Int(4), Cell::Int(5), Cell::Int(3)]
        );
        assert_eq!(
            d.table.column("Comment").unwrap().cells,
            vec![Cell::Empty, Cell::Empty, Cell::text("ok")]
        );
        assert_eq!(d.sources.len(), 2);
    }

    #[test]
    fn no_files() {
        assert!(matches!(
            load_sources(&[]).map_err(|e| *e),
            Err(SurveyError::NoInputFiles {})
        ));
    }

    #[test]
    fn unknown_provider() {
        let sources = vec![FileSource {
            provider: Some("sav".to_string()),
            file_path: "answers.sav".to_string(),
            excel_worksheet_name: None,
        }];
        assert!(load_sources(&sources).is_err());
    }
}
