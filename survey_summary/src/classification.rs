use log::debug;

use std::collections::HashSet;

use crate::model::*;
use crate::table::{Cell, RawTable};

// These values are part of the output format: changing them changes the
// classification of existing surveys.

/// The answers of a five-point rating scale.
const SCALE_VALUES: [&str; 5] = ["1", "2", "3", "4", "5"];

/// The answers of a yes/no question, compared in lower case.
const BINARY_VOCABULARY: [&str; 7] = [
    "так",
    "ні",
    "не знаю",
    "yes",
    "no",
    "don't know",
    "dont know",
];

/// A closed question has at most that many distinct answers...
const MAX_CATEGORICAL_VALUES: usize = 15;

/// ... and the answers must repeat: distinct values / answers.
const MAX_CATEGORICAL_RATIO: f64 = 0.7;

/// Infers the type of a question from its answers.
///
/// Only the set of distinct answers and the number of answers matter: the order
/// of the rows has no effect. The first matching rule wins:
/// 1. no answer at all: open
/// 2. only values from 1 to 5: scale
/// 3. only yes / no / don't know (any case): binary
/// 4. at most 15 distinct values, repeated enough: categorical
/// 5. anything else: open
pub fn classify(cells: &[Cell]) -> QuestionType {
    let answers: Vec<String> = cells.iter().filter_map(|c| c.lossy_normalized()).collect();
    if answers.is_empty() {
        return QuestionType::Open;
    }

    let distinct: HashSet<&str> = answers.iter().map(|s| s.as_str()).collect();

    if distinct.iter().all(|v| SCALE_VALUES.contains(v)) {
        return QuestionType::Scale;
    }

    let lowered: HashSet<String> = distinct.iter().map(|v| v.to_lowercase()).collect();
    if lowered
        .iter()
        .all(|v| BINARY_VOCABULARY.contains(&v.as_str()))
    {
        return QuestionType::Binary;
    }

    let ratio = distinct.len() as f64 / answers.len().max(1) as f64;
    if distinct.len() <= MAX_CATEGORICAL_VALUES && ratio <= MAX_CATEGORICAL_RATIO {
        return QuestionType::Categorical;
    }

    QuestionType::Open
}

/// Classifies all the columns of a table.
///
/// The first `technical_column_count` columns are metadata: they are tagged as
/// technical with the code `-`. The other columns are numbered Q1, Q2, ... in order.
pub fn classify_all(
    table: &RawTable,
    technical_column_count: usize,
) -> Result<QuestionCatalog, SummaryErrors> {
    if technical_column_count > table.num_columns() {
        return Err(SummaryErrors::TooManyTechnicalColumns {
            requested: technical_column_count,
            available: table.num_columns(),
        });
    }

    let mut entries: Vec<(String, QuestionInfo)> = Vec::new();
    for (idx, col) in table.columns().iter().enumerate() {
        let info = if idx < technical_column_count {
            QuestionInfo {
                code: TECHNICAL_CODE.to_string(),
                text: col.name.trim().to_string(),
                qtype: QuestionType::Technical,
            }
        } else {
            QuestionInfo {
                code: format!("Q{}", idx - technical_column_count + 1),
                text: col.name.trim().to_string(),
                qtype: classify(&col.cells),
            }
        };
        debug!(
            "classify_all: column {:?} -> {} {:?}",
            col.name, info.code, info.qtype
        );
        entries.push((col.name.clone(), info));
    }
    Ok(QuestionCatalog::new(entries))
}
