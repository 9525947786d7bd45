use clap::Parser;

/// This is a program to classify and tabulate the responses of a survey.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the survey description in JSON format.
    /// For more information about the file format, read the documentation of the `manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the expected summary in JSON format. If provided, survtally will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the survey will be written in JSON format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, a spreadsheet report will be written to the given location.
    #[clap(long, value_parser)]
    pub xlsx: Option<String>,

    /// (file path or empty) If specified, a PDF report with the tables and the charts will be written to the
    /// given location.
    #[clap(long, value_parser)]
    pub pdf: Option<String>,

    /// (file path, optional) A TrueType font with Cyrillic glyphs for the PDF report. By default, a few usual
    /// system fonts are tried.
    #[clap(long, value_parser)]
    pub pdf_font: Option<String>,

    /// (file paths) The files containing the responses. The option may be repeated: all the files are
    /// stacked together. Setting this option overrides the file sources of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Vec<String>,

    /// (default: from the file extension) The type of the input: xlsx or csv.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the only worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 2) The first row to process, numbered as in the spreadsheet (row 1 is the header).
    #[clap(long, value_parser)]
    pub from_row: Option<usize>,

    /// (default: the last row) The last row to process, included.
    #[clap(long, value_parser)]
    pub to_row: Option<usize>,

    /// (default 1) The number of leading columns that are not questions (timestamp, e-mail, ...).
    #[clap(long, value_parser)]
    pub technical_columns: Option<usize>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
