use log::{debug, info, warn};

use std::collections::BTreeMap;

use crate::model::*;
use crate::table::{Cell, RawTable};

/// Builds the frequency tables of all the closed questions.
///
/// Open and technical questions are skipped. The output follows the order of the
/// catalog. A column that cannot be read gets an empty table; the other columns
/// are not affected.
pub fn summarize(table: &RawTable, catalog: &QuestionCatalog) -> Vec<QuestionSummary> {
    info!(
        "summarize: {} rows, {} columns",
        table.num_rows(),
        catalog.len()
    );
    let mut summaries: Vec<QuestionSummary> = Vec::new();
    for (name, info) in catalog.iter() {
        if !info.qtype.is_aggregable() {
            continue;
        }
        let freq = match table.column(name) {
            Some(col) => match frequency_table(&col.cells) {
                Ok(t) => t,
                Err(e) => {
                    warn!(
                        "summarize: question {} ({:?}) cannot be tabulated: {}",
                        info.code, name, e
                    );
                    FrequencyTable::empty()
                }
            },
            None => {
                warn!(
                    "summarize: question {} ({:?}) is missing from the table",
                    info.code, name
                );
                FrequencyTable::empty()
            }
        };
        debug!("summarize: {} -> {:?}", info.code, freq);
        summaries.push(QuestionSummary {
            question: info.clone(),
            table: freq,
        });
    }
    summaries
}

/// Counts the distinct answers of a column.
///
/// The answers are trimmed but keep their case. Rows are sorted by value, and the
/// percentages are rounded to one decimal each, so they may not add up to exactly 100.
pub fn frequency_table(cells: &[Cell]) -> Result<FrequencyTable, SummaryErrors> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for c in cells {
        if let Some(v) = c.normalized()? {
            *counts.entry(v).or_insert(0) += 1;
        }
    }
    let total: u64 = counts.values().sum();
    let rows = counts
        .into_iter()
        .map(|(value, count)| FrequencyRow {
            value,
            count,
            percent: round1(count as f64 / total as f64 * 100.0),
        })
        .collect();
    Ok(FrequencyTable { rows })
}

// Ties go to the even digit: 6.25 -> 6.2.
fn round1(x: f64) -> f64 {
    (x * 10.0).round_ties_even() / 10.0
}
