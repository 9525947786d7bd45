// Primitives for reading CSV files.

use crate::survey::{io_common::header_names, *};

/// Reads the responses stored in a CSV file. The first line holds the questions.
pub fn read_csv_table(path: &str) -> BSurveyResult<RawTable> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();

    let header = match records.next() {
        Some(line_r) => line_r.context(CsvLineParseSnafu { lineno: 1_usize })?,
        None => return Err(Box::new(SurveyError::EmptyExcel {})),
    };
    let raw_names: Vec<Option<String>> = header.iter().map(|s| Some(s.to_string())).collect();
    let names = header_names(&raw_names);
    debug!("read_csv_table: header: {:?}", names);

    let mut builder = builder::TableBuilder::with_headers(&names).context(SummarySnafu {})?;
    for (idx, line_r) in records.enumerate() {
        // The index starts at 1 to respect most conventions in the excel world
        let lineno = idx + 2;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_table: lineno: {:?} row: {:?}", lineno, &line);
        let cells: Vec<Cell> = line.iter().map(read_cell).collect();
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

/// CSV files carry no type: numbers are recognized, empty fields are missing answers.
pub fn read_cell(s: &str) -> Cell {
    if s.is_empty() {
        Cell::Empty
    } else if let Ok(i) = s.trim().parse::<i64>() {
        Cell::Int(i)
    } else if let Ok(f) = s.trim().parse::<f64>() {
        Cell::Float(f)
    } else {
        Cell::Text(s.to_string())
    }
}
