use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::Value as JSValue;
use survey_summary::*;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::cache::{ReportArtifacts, ReportCache, ReportOptions};
use crate::survey::config_reader::*;
use crate::survey::loader::LoadedData;
use crate::survey::report::ReportContext;

mod cache;
pub mod config_reader;
mod export_json;
mod export_pdf;
mod export_xlsx;
mod io_common;
mod io_csv;
mod io_excel;
mod loader;
mod report;

/// The output path that designates the standard output.
const STDOUT: &str = "stdout";

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The input file or the worksheet is empty"))]
    EmptyExcel {},
    #[snafu(display("Cannot find worksheet {worksheet} in {path}"))]
    MissingWorksheet { path: String, worksheet: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive number in the configuration"))]
    ParsingJsonNumber {},
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("No input file: use --input or the fileSources of the configuration"))]
    NoInputFiles {},
    #[snafu(display("Input type not implemented: {provider}"))]
    UnknownProvider { provider: String },

    #[snafu(display("The first row ({from_row}) cannot be after the last row ({to_row})"))]
    InvertedRange { from_row: usize, to_row: usize },
    #[snafu(display(
        "Rows {from_row}-{to_row} are outside of the responses (rows {min_row}-{max_row})"
    ))]
    RowRange {
        from_row: usize,
        to_row: usize,
        min_row: usize,
        max_row: usize,
    },
    #[snafu(display("Invalid survey data: {source}"))]
    Summary { source: SummaryErrors },

    #[snafu(display("Error writing the spreadsheet report"))]
    WritingXlsx { source: rust_xlsxwriter::XlsxError },
    #[snafu(display("Error opening font {path}"))]
    OpeningFont {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing the PDF report"))]
    WritingPdf { source: printpdf::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between calculated summary and reference summary {path}"))]
    ReferenceMismatch { path: String },
}

pub type SurveyResult<T> = Result<T, SurveyError>;
pub type BSurveyResult<T> = Result<T, Box<SurveyError>>;

/// Runs the whole pipeline: loading, classification, tabulation and reports.
pub fn run_survey(args: &Args) -> BSurveyResult<()> {
    let (config, root): (SurveyConfig, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (config, root)
        }
        None => (SurveyConfig::default(), PathBuf::new()),
    };
    let config = merge_args(config, root.as_path(), args)?;
    info!("config: {:?}", config);

    let data = loader::load_sources(&config.file_sources)?;
    info!(
        "Loaded {} responses and {} columns from {:?}",
        data.n_rows(),
        data.n_cols(),
        data.sources
    );
    debug!("preview: {:?}", data.table.head(5));

    let technical_columns = config.technical_columns()?;
    let mut cache = ReportCache::new();
    for request in config.reports.iter() {
        run_report(
            &data,
            request,
            &config.survey_name(),
            technical_columns,
            config.output_settings.pdf_font.as_deref(),
            &mut cache,
        )?;
    }
    Ok(())
}

fn run_report(
    data: &LoadedData,
    request: &ReportRequest,
    survey_name: &str,
    technical_columns: usize,
    pdf_font: Option<&str>,
    cache: &mut ReportCache,
) -> BSurveyResult<()> {
    let (min_row, max_row) = data.row_bounds();
    let from_row = request.from_row.unwrap_or(min_row);
    let to_row = request.to_row.unwrap_or(max_row);
    let options = ReportOptions {
        survey_name: survey_name.to_string(),
        technical_columns,
        with_xlsx: request.xlsx_file.is_some(),
        with_pdf: request.pdf_file.is_some(),
        pdf_font: pdf_font.map(|f| f.to_string()),
    };

    let artifacts = cache.get_or_try_insert(&data.table, from_row, to_row, &options, || {
        build_report(data, from_row, to_row, &options)
    })?;

    match request.summary_file.as_deref() {
        Some(path) if path != STDOUT => write_output(path, artifacts.summary.as_bytes())?,
        _ => println!("{}", artifacts.summary),
    }
    if let (Some(path), Some(bytes)) = (request.xlsx_file.as_deref(), artifacts.xlsx.as_ref()) {
        write_output(path, bytes)?;
    }
    if let (Some(path), Some(bytes)) = (request.pdf_file.as_deref(), artifacts.pdf.as_ref()) {
        write_output(path, bytes)?;
    }
    if let Some(reference_path) = request.reference_file.as_deref() {
        check_reference(reference_path, &artifacts.summary)?;
    }
    Ok(())
}

/// Classifies and tabulates one range of rows, and renders the reports.
pub fn build_report(
    data: &LoadedData,
    from_row: usize,
    to_row: usize,
    options: &ReportOptions,
) -> BSurveyResult<ReportArtifacts> {
    let sliced = data.slice_range(from_row, to_row)?;
    info!(
        "Processing rows {}-{}: {} responses",
        from_row,
        to_row,
        sliced.num_rows()
    );

    let catalog = classify_all(&sliced, options.technical_columns).context(SummarySnafu {})?;
    for (name, info) in catalog.questions() {
        info!("{:>4} {:<24} {}", info.code, info.qtype.label(), name);
    }

    let summaries = summarize(&sliced, &catalog);
    for qs in summaries.iter() {
        info!("{}. {}", qs.question.code, qs.question.text);
        for row in qs.table.rows.iter() {
            info!("      {:>5} {:>5.1}% {}", row.count, row.percent, row.value);
        }
    }

    let ctx = ReportContext::new(
        &options.survey_name,
        data.n_rows(),
        &sliced,
        &catalog,
        &summaries,
        from_row,
        to_row,
    );
    let summary_js = export_json::build_summary_js(&ctx);
    let summary = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    let xlsx = if options.with_xlsx {
        Some(export_xlsx::build_xlsx_report(&ctx)?)
    } else {
        None
    };
    let pdf = if options.with_pdf {
        Some(export_pdf::build_pdf_report(
            &ctx,
            options.pdf_font.as_deref(),
        )?)
    } else {
        None
    };
    Ok(ReportArtifacts { summary, xlsx, pdf })
}

fn write_output(path: &str, bytes: &[u8]) -> BSurveyResult<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu { path })?;
        }
    }
    fs::write(path, bytes).context(WritingOutputSnafu { path })?;
    info!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Compares a computed summary with a reference summary.
pub fn check_reference(reference_path: &str, pretty_js_stats: &str) -> BSurveyResult<()> {
    let summary_ref = read_reference(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference {:?}", reference_path);
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail()
        .map_err(Box::new);
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}
