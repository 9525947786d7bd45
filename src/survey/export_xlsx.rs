// The spreadsheet report: the parameters of the run, the raw responses and
// one frequency table per question with its chart.

use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet};

use crate::survey::report::{chart_kind, ChartKind, ReportContext};
use crate::survey::*;

const INFO_SHEET: &str = "Технічна_інформація";
const DATA_SHEET: &str = "Вихідні_дані";
const SUMMARY_SHEET: &str = "Підсумки";

/// Blank rows between two questions on the summary sheet.
const QUESTION_GAP: u32 = 2;
/// Column where the charts are anchored.
const CHART_COLUMN: u16 = 5;

pub fn build_xlsx_report(ctx: &ReportContext) -> BSurveyResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let ws = workbook.add_worksheet();
    ws.set_name(INFO_SHEET).context(WritingXlsxSnafu {})?;
    write_info_sheet(ws, ctx, &bold).context(WritingXlsxSnafu {})?;

    let ws = workbook.add_worksheet();
    ws.set_name(DATA_SHEET).context(WritingXlsxSnafu {})?;
    write_data_sheet(ws, ctx.sliced, &bold).context(WritingXlsxSnafu {})?;

    let ws = workbook.add_worksheet();
    ws.set_name(SUMMARY_SHEET).context(WritingXlsxSnafu {})?;
    write_summary_sheet(ws, ctx, &bold).context(WritingXlsxSnafu {})?;

    let bytes = workbook.save_to_buffer().context(WritingXlsxSnafu {})?;
    debug!("build_xlsx_report: {} bytes", bytes.len());
    Ok(bytes)
}

fn write_info_sheet(
    ws: &mut Worksheet,
    ctx: &ReportContext,
    bold: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    ws.write_string_with_format(0, 0, "Параметр", bold)?;
    ws.write_string_with_format(0, 1, "Значення", bold)?;
    ws.write_string(1, 0, "Опитування")?;
    ws.write_string(1, 1, ctx.survey_name)?;
    ws.write_string(2, 0, "Загальна кількість відповідей")?;
    ws.write_number(2, 1, ctx.total_responses as f64)?;
    ws.write_string(3, 0, "Кількість відповідей у вибраному діапазоні")?;
    ws.write_number(3, 1, ctx.selected_responses() as f64)?;
    ws.write_string(4, 0, "Діапазон обробки")?;
    ws.write_string(4, 1, ctx.range_info().as_str())?;
    ws.set_column_width(0, 45)?;
    ws.set_column_width(1, 40)?;
    Ok(())
}

fn write_data_sheet(
    ws: &mut Worksheet,
    table: &RawTable,
    bold: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    for (cidx, column) in table.columns().iter().enumerate() {
        let col = cidx as u16;
        ws.write_string_with_format(0, col, column.name.as_str(), bold)?;
        for (ridx, cell) in column.cells.iter().enumerate() {
            write_cell(ws, ridx as u32 + 1, col, cell)?;
        }
    }
    Ok(())
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match cell {
        Cell::Empty => {}
        Cell::Text(s) => {
            ws.write_string(row, col, s.as_str())?;
        }
        Cell::Int(i) => {
            ws.write_number(row, col, *i as f64)?;
        }
        Cell::Float(f) if f.is_finite() => {
            ws.write_number(row, col, *f)?;
        }
        Cell::Float(_) => {}
        Cell::Bool(b) => {
            ws.write_boolean(row, col, *b)?;
        }
        Cell::Error(e) => {
            ws.write_string(row, col, e.as_str())?;
        }
    }
    Ok(())
}

fn write_summary_sheet(
    ws: &mut Worksheet,
    ctx: &ReportContext,
    bold: &Format,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    let mut row: u32 = 0;
    for qs in ctx.summaries.iter() {
        let title = format!("{}. {}", qs.question.code, qs.question.text);
        ws.write_string_with_format(row, 0, title.as_str(), bold)?;
        row += 1;

        let header_row = row;
        ws.write_string_with_format(row, 0, FrequencyTable::VALUE_COLUMN, bold)?;
        ws.write_string_with_format(row, 1, FrequencyTable::COUNT_COLUMN, bold)?;
        ws.write_string_with_format(row, 2, FrequencyTable::PERCENT_COLUMN, bold)?;
        row += 1;

        for r in qs.table.rows.iter() {
            ws.write_string(row, 0, r.value.as_str())?;
            ws.write_number(row, 1, r.count as f64)?;
            ws.write_number(row, 2, r.percent)?;
            row += 1;
        }

        if !qs.table.is_empty() {
            let first = header_row + 1;
            let last = row - 1;
            let mut chart = match chart_kind(qs) {
                ChartKind::Bar => Chart::new(ChartType::Column),
                ChartKind::Pie => Chart::new(ChartType::Pie),
            };
            chart
                .add_series()
                .set_categories((SUMMARY_SHEET, first, 0, last, 0))
                .set_values((SUMMARY_SHEET, first, 1, last, 1))
                .set_name(title.as_str());
            chart.title().set_name(title.as_str());
            ws.insert_chart(header_row, CHART_COLUMN, &chart)?;
            // Keeps the next question below the chart.
            row = row.max(header_row + 15);
        }
        row += QUESTION_GAP;
    }
    ws.set_column_width(0, 40)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workbook_round_trip() {
        let mut b = builder::TableBuilder::with_headers(&[
            "Позначка часу".to_string(),
            "Оцініть курс".to_string(),
            "Чи рекомендуєте?".to_string(),
        ])
        .unwrap();
        b.add_row_text(&["1", "5", "Так"]).unwrap();
        b.add_row_text(&["2", "4", "Ні"]).unwrap();
        b.add_row_text(&["3", "5", ""]).unwrap();
        let table = b.build().unwrap();
        let catalog = classify_all(&table, 1).unwrap();
        let summaries = summarize(&table, &catalog);
        let ctx = ReportContext::new("Курс", 10, &table, &catalog, &summaries, 2, 4);
        let bytes = build_xlsx_report(&ctx).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        fs::write(&path, &bytes).unwrap();
        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(
            workbook.sheet_names().to_vec(),
            vec![
                INFO_SHEET.to_string(),
                DATA_SHEET.to_string(),
                SUMMARY_SHEET.to_string()
            ]
        );

        let info = workbook.worksheet_range(INFO_SHEET).unwrap().unwrap();
        assert_eq!(
            info.get_value((2, 1)),
            Some(&calamine::DataType::Float(10.0))
        );
        assert_eq!(
            info.get_value((3, 1)),
            Some(&calamine::DataType::Float(3.0))
        );

        let data = workbook.worksheet_range(DATA_SHEET).unwrap().unwrap();
        assert_eq!(data.get_size(), (4, 3));

        let summary = workbook.worksheet_range(SUMMARY_SHEET).unwrap().unwrap();
        assert_eq!(
            summary.get_value((0, 0)),
            Some(&calamine::DataType::String("Q1. Оцініть курс".to_string()))
        );
        assert_eq!(
            summary.get_value((1, 0)),
            Some(&calamine::DataType::String("Варіант відповіді".to_string()))
        );
        assert_eq!(
            summary.get_value((2, 1)),
            Some(&calamine::DataType::Float(1.0))
        );
    }
}
