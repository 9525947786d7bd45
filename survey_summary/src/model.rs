// ********* Question data structures ***********

use std::error::Error;
use std::fmt::Display;

use serde::Serialize;

/// The code given to the technical columns. They never receive a question number.
pub const TECHNICAL_CODE: &str = "-";

/// By default, only the first column (the submission timestamp of the form) is technical.
pub const DEFAULT_TECHNICAL_COLUMNS: usize = 1;

/// The semantic type of a question, as inferred from the answers.
///
/// The serialized form is the label displayed in the reports.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize)]
pub enum QuestionType {
    /// Metadata column (timestamp, e-mail, ...). Never analysed.
    #[serde(rename = "Технічне поле")]
    Technical,
    /// Ordinal 1-5 rating (Likert).
    #[serde(rename = "Шкальна (1–5)")]
    Scale,
    /// Yes / no / don't know.
    #[serde(rename = "Дихотомічна (Так/Ні)")]
    Binary,
    /// Closed choice with a small repeated vocabulary.
    #[serde(rename = "Категоріальна")]
    Categorical,
    /// Free text, or nothing to classify.
    #[serde(rename = "Відкрита / текстова")]
    Open,
}

impl QuestionType {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionType::Technical => "Технічне поле",
            QuestionType::Scale => "Шкальна (1–5)",
            QuestionType::Binary => "Дихотомічна (Так/Ні)",
            QuestionType::Categorical => "Категоріальна",
            QuestionType::Open => "Відкрита / текстова",
        }
    }

    /// Only the closed questions get a frequency table.
    pub fn is_aggregable(&self) -> bool {
        matches!(
            self,
            QuestionType::Scale | QuestionType::Binary | QuestionType::Categorical
        )
    }
}

impl Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct QuestionInfo {
    /// Q1, Q2, ... in column order, or `-` for the technical columns.
    pub code: String,
    /// The header of the column, trimmed.
    pub text: String,
    pub qtype: QuestionType,
}

/// The outcome of a classification pass: column name -> question, in column order.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct QuestionCatalog {
    entries: Vec<(String, QuestionInfo)>,
}

impl QuestionCatalog {
    pub(crate) fn new(entries: Vec<(String, QuestionInfo)>) -> QuestionCatalog {
        QuestionCatalog { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QuestionInfo)> {
        self.entries.iter().map(|(name, info)| (name, info))
    }

    pub fn get(&self, column_name: &str) -> Option<&QuestionInfo> {
        self.entries
            .iter()
            .find(|(name, _)| name == column_name)
            .map(|(_, info)| info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The questions that are not technical columns.
    pub fn questions(&self) -> impl Iterator<Item = (&String, &QuestionInfo)> {
        self.iter()
            .filter(|(_, info)| info.qtype != QuestionType::Technical)
    }
}

// ******** Frequency tables *********

/// One distinct answer of a question.
///
/// The serialized column names are read as-is by the report renderers.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct FrequencyRow {
    #[serde(rename = "Варіант відповіді")]
    pub value: String,
    #[serde(rename = "Кількість")]
    pub count: u64,
    #[serde(rename = "%")]
    pub percent: f64,
}

/// The answers of a question, sorted by value.
///
/// An empty table means that there is nothing to chart: the column had no answer,
/// or it could not be read.
#[derive(PartialEq, Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    pub rows: Vec<FrequencyRow>,
}

impl FrequencyTable {
    pub const VALUE_COLUMN: &'static str = "Варіант відповіді";
    pub const COUNT_COLUMN: &'static str = "Кількість";
    pub const PERCENT_COLUMN: &'static str = "%";

    pub fn empty() -> FrequencyTable {
        FrequencyTable { rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// The number of answers accounted for in this table.
    pub fn total(&self) -> u64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    pub fn percent_sum(&self) -> f64 {
        self.rows.iter().map(|r| r.percent).sum()
    }
}

#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub question: QuestionInfo,
    pub table: FrequencyTable,
}

// ******** Errors *********

/// Errors on the boundary of the library: the shape of the input is not acceptable.
///
/// Anomalies inside the values of a column are not reported here, they only
/// degrade the column.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SummaryErrors {
    TooManyTechnicalColumns { requested: usize, available: usize },
    RaggedColumn { name: String, expected: usize, found: usize },
    DuplicateColumn(String),
    RowTooLong { expected: usize, found: usize },
    RowRangeOutOfBounds { start: usize, end: usize, num_rows: usize },
    InvalidCell { content: String },
}

impl Error for SummaryErrors {}

impl Display for SummaryErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryErrors::TooManyTechnicalColumns {
                requested,
                available,
            } => write!(
                f,
                "{} technical columns requested but the table only has {} columns",
                requested, available
            ),
            SummaryErrors::RaggedColumn {
                name,
                expected,
                found,
            } => write!(
                f,
                "column {:?} has {} cells, expected {}",
                name, found, expected
            ),
            SummaryErrors::DuplicateColumn(name) => write!(f, "duplicate column {:?}", name),
            SummaryErrors::RowTooLong { expected, found } => write!(
                f,
                "row has {} cells but the table only has {} columns",
                found, expected
            ),
            SummaryErrors::RowRangeOutOfBounds {
                start,
                end,
                num_rows,
            } => write!(
                f,
                "rows {}..={} are outside of a table with {} rows",
                start, end, num_rows
            ),
            SummaryErrors::InvalidCell { content } => {
                write!(f, "cell cannot be read as an answer: {}", content)
            }
        }
    }
}
