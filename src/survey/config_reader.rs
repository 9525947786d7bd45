use crate::args::Args;
use crate::survey::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    #[serde(rename = "surveyName")]
    pub survey_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    /// A TrueType font for the PDF reports.
    #[serde(rename = "pdfFont")]
    pub pdf_font: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The provider, or a guess from the extension of the file.
    pub fn provider(&self) -> String {
        match &self.provider {
            Some(p) => p.to_lowercase(),
            None => {
                let ext = Path::new(&self.file_path)
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_lowercase());
                match ext.as_deref() {
                    Some("csv") => "csv".to_string(),
                    _ => "xlsx".to_string(),
                }
            }
        }
    }
}

/// One range of rows to process, and where to put the results.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportRequest {
    #[serde(rename = "fromRow")]
    pub from_row: Option<usize>,
    #[serde(rename = "toRow")]
    pub to_row: Option<usize>,
    #[serde(rename = "summaryFile")]
    pub summary_file: Option<String>,
    #[serde(rename = "xlsxFile")]
    pub xlsx_file: Option<String>,
    #[serde(rename = "pdfFile")]
    pub pdf_file: Option<String>,
    #[serde(rename = "referenceFile")]
    pub reference_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSources", default)]
    pub file_sources: Vec<FileSource>,
    #[serde(rename = "technicalColumns")]
    _technical_columns: Option<JSValue>,
    #[serde(default)]
    pub reports: Vec<ReportRequest>,
}

impl SurveyConfig {
    pub fn technical_columns(&self) -> SurveyResult<usize> {
        match &self._technical_columns {
            None => Ok(DEFAULT_TECHNICAL_COLUMNS),
            x => read_js_int(x),
        }
    }

    pub fn survey_name(&self) -> String {
        self.output_settings
            .survey_name
            .clone()
            .unwrap_or_else(|| "Survey".to_string())
    }
}

pub fn read_config(path: &str) -> BSurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: SurveyConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Applies the command line on top of the configuration file.
///
/// The paths of the configuration file are resolved against `root`, the paths
/// given on the command line are kept as they are.
pub fn merge_args(config: SurveyConfig, root: &Path, args: &Args) -> SurveyResult<SurveyConfig> {
    let out_dir: PathBuf = match &config.output_settings.output_directory {
        Some(d) => root.join(d),
        None => root.to_path_buf(),
    };

    let file_sources: Vec<FileSource> = if args.input.is_empty() {
        config
            .file_sources
            .iter()
            .map(|src| FileSource {
                file_path: resolve(root, &src.file_path),
                ..src.clone()
            })
            .collect()
    } else {
        args.input
            .iter()
            .map(|p| FileSource {
                provider: args.input_type.clone(),
                file_path: p.clone(),
                excel_worksheet_name: args.excel_worksheet_name.clone(),
            })
            .collect()
    };

    let from_cli = args.from_row.is_some()
        || args.to_row.is_some()
        || args.out.is_some()
        || args.xlsx.is_some()
        || args.pdf.is_some();
    let mut reports: Vec<ReportRequest> = if from_cli || config.reports.is_empty() {
        vec![ReportRequest {
            from_row: args.from_row,
            to_row: args.to_row,
            summary_file: args.out.clone(),
            xlsx_file: args.xlsx.clone(),
            pdf_file: args.pdf.clone(),
            reference_file: None,
        }]
    } else {
        config
            .reports
            .iter()
            .map(|r| ReportRequest {
                summary_file: r.summary_file.as_ref().map(|p| resolve(&out_dir, p)),
                xlsx_file: r.xlsx_file.as_ref().map(|p| resolve(&out_dir, p)),
                pdf_file: r.pdf_file.as_ref().map(|p| resolve(&out_dir, p)),
                reference_file: r.reference_file.as_ref().map(|p| resolve(root, p)),
                ..r.clone()
            })
            .collect()
    };
    if let Some(reference) = &args.reference {
        for r in reports.iter_mut() {
            r.reference_file = Some(reference.clone());
        }
    }

    let technical_columns = match args.technical_columns {
        Some(x) => x,
        None => config.technical_columns()?,
    };

    let pdf_font = match &args.pdf_font {
        Some(f) => Some(f.clone()),
        None => config
            .output_settings
            .pdf_font
            .as_ref()
            .map(|f| resolve(root, f)),
    };

    Ok(SurveyConfig {
        output_settings: OutputSettings {
            pdf_font,
            ..config.output_settings.clone()
        },
        file_sources,
        _technical_columns: Some(JSValue::from(technical_columns)),
        reports,
    })
}

fn resolve(root: &Path, path: &str) -> String {
    if path == STDOUT {
        return path.to_string();
    }
    let p: PathBuf = root.join(path);
    p.as_path().display().to_string()
}

pub fn read_reference(path: &str) -> BSurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> SurveyResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "outputSettings": {
            "surveyName": "Course evaluation",
            "outputDirectory": "out",
            "pdfFont": "fonts/DejaVuSans.ttf"
        },
        "fileSources": [
            { "provider": "xlsx", "filePath": "responses.xlsx" },
            { "filePath": "late.CSV" }
        ],
        "technicalColumns": "2",
        "reports": [
            { "fromRow": 2, "toRow": 10, "summaryFile": "a.json" },
            { "fromRow": 11, "xlsxFile": "b.xlsx", "pdfFile": "b.pdf", "summaryFile": "stdout" }
        ]
    }"#;

    #[test]
    fn parse_config() {
        let config: SurveyConfig = serde_json::from_str(CONFIG).unwrap();
        assert_eq!(config.technical_columns().unwrap(), 2);
        assert_eq!(config.survey_name(), "Course evaluation");
        assert_eq!(config.file_sources[0].provider(), "xlsx");
        assert_eq!(config.file_sources[1].provider(), "csv");
        assert_eq!(config.reports.len(), 2);
        assert_eq!(config.reports[1].to_row, None);
    }

    #[test]
    fn defaults() {
        let config: SurveyConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.technical_columns().unwrap(), 1);
        assert!(config.file_sources.is_empty());

        let bad: SurveyConfig = serde_json::from_str(r#"{"technicalColumns": "one"}"#).unwrap();
        assert!(bad.technical_columns().is_err());
    }

    #[test]
    fn paths_are_relative_to_the_config() {
        let config: SurveyConfig = serde_json::from_str(CONFIG).unwrap();
        let root = Path::new("surveys");
        let merged = merge_args(config, root, &Args::default()).unwrap();
        assert_eq!(
            merged.file_sources[0].file_path,
            Path::new("surveys").join("responses.xlsx").display().to_string()
        );
        assert_eq!(
            merged.reports[0].summary_file,
            Some(Path::new("surveys").join("out").join("a.json").display().to_string())
        );
        assert_eq!(merged.reports[1].summary_file, Some("stdout".to_string()));
        assert_eq!(
            merged.reports[1].pdf_file,
            Some(Path::new("surveys").join("out").join("b.pdf").display().to_string())
        );
        assert_eq!(merged.reports[0].pdf_file, None);
        assert_eq!(
            merged.output_settings.pdf_font,
            Some(Path::new("surveys").join("fonts/DejaVuSans.ttf").display().to_string())
        );
        assert_eq!(merged.technical_columns().unwrap(), 2);
    }

    #[test]
    fn command_line_wins() {
        let config: SurveyConfig = serde_json::from_str(CONFIG).unwrap();
        let args = Args {
            input: vec!["other.csv".to_string()],
            from_row: Some(3),
            out: Some("stdout".to_string()),
            pdf: Some("report.pdf".to_string()),
            pdf_font: Some("my.ttf".to_string()),
            technical_columns: Some(0),
            reference: Some("expected.json".to_string()),
            ..Args::default()
        };
        let merged = merge_args(config, Path::new("surveys"), &args).unwrap();
        assert_eq!(merged.file_sources.len(), 1);
        assert_eq!(merged.file_sources[0].file_path, "other.csv");
        assert_eq!(merged.file_sources[0].provider(), "csv");
        assert_eq!(merged.reports.len(), 1);
        assert_eq!(merged.reports[0].from_row, Some(3));
        assert_eq!(merged.reports[0].pdf_file, Some("report.pdf".to_string()));
        assert_eq!(merged.output_settings.pdf_font, Some("my.ttf".to_string()));
        assert_eq!(
            merged.reports[0].reference_file,
            Some("expected.json".to_string())
        );
        assert_eq!(merged.technical_columns().unwrap(), 0);
    }
}
