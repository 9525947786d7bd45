// Primitives for reading Excel files.

use calamine::DataType;

use crate::survey::{io_common::header_names, *};

/// Reads the responses stored in a workbook.
///
/// The first row of the sheet holds the questions.
pub fn read_excel_table(path: &str, cfs: &FileSource) -> BSurveyResult<RawTable> {
    let wrange = get_range(path, cfs)?;

    let mut iter = wrange.rows();
    let header = iter.next().context(EmptyExcelSnafu {})?;
    let raw_names: Vec<Option<String>> = header
        .iter()
        .map(|c| read_cell(c).lossy_normalized())
        .collect();
    let names = header_names(&raw_names);
    debug!("read_excel_table: header: {:?}", names);

    let mut builder = builder::TableBuilder::with_headers(&names).context(SummarySnafu {})?;
    for (idx, row) in iter.enumerate() {
        debug!("read_excel_table: row {}: {:?}", idx + 2, row);
        let cells: Vec<Cell> = row.iter().map(read_cell).collect();
        builder.add_row(cells).context(SummarySnafu {})?;
    }
    let table = builder.build().context(SummarySnafu {})?;
    info!(
        "Read {} responses from {:?}",
        table.num_rows(),
        io_common::simplify_file_name(path)
    );
    Ok(table)
}

pub fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::String(s) => Cell::Text(s.clone()),
        DataType::Int(i) => Cell::Int(*i),
        DataType::Float(f) => Cell::Float(*f),
        DataType::Bool(b) => Cell::Bool(*b),
        // The timestamps of the forms.
        DataType::DateTime(f) => match cell.as_datetime() {
            Some(dt) => Cell::Text(dt.to_string()),
            None => Cell::Float(*f),
        },
        DataType::Error(e) => Cell::Error(e.to_string()),
        #[allow(unreachable_patterns)]
        _ => Cell::Error(format!("{:?}", cell)),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> BSurveyResult<calamine::Range<DataType>> {
    let worksheet_name_o = cfs.excel_worksheet_name.clone();
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: worksheet_name.clone(),
            })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let all_worksheets = workbook.worksheets();
        match all_worksheets.as_slice() {
            [] => Err(Box::new(SurveyError::EmptyExcel {})),
            [(worksheet_name, wrange)] => {
                debug!(
                    "read_excel_table: path: {:?} worksheet: {:?}",
                    &path, &worksheet_name
                );
                Ok(wrange.clone())
            }
            [(worksheet_name, wrange), ..] => {
                warn!(
                    "{:?} has {} worksheets, using the first one ({:?}). Use --excel-worksheet-name to pick another one.",
                    path,
                    all_worksheets.len(),
                    worksheet_name
                );
                Ok(wrange.clone())
            }
        }
    }
}
