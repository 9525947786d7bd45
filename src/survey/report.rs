use serde::Serialize;

use crate::survey::*;

/// The shape of the chart drawn for a question.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Pie,
}

/// Bar charts for the ratings, pie charts for everything else.
///
/// A question that was not detected as a 1-5 scale is still drawn with bars when all
/// its answers are numbers between 0 and 10. This only affects the drawing: the type of
/// the question does not change.
pub fn chart_kind(qs: &QuestionSummary) -> ChartKind {
    if qs.question.qtype == QuestionType::Scale {
        return ChartKind::Bar;
    }
    let all_numeric = !qs.table.is_empty()
        && qs.table.rows.iter().all(|r| match r.value.parse::<f64>() {
            Ok(x) => (0.0..=10.0).contains(&x),
            Err(_) => false,
        });
    if all_numeric {
        ChartKind::Bar
    } else {
        ChartKind::Pie
    }
}

/// A line of the overview of the questions.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct QuestionOverview {
    #[serde(rename = "Код")]
    pub code: String,
    #[serde(rename = "Назва стовпця")]
    pub column: String,
    #[serde(rename = "Тип")]
    pub qtype: String,
}

/// Everything the renderers need for one range of rows.
pub struct ReportContext<'a> {
    pub survey_name: &'a str,
    pub total_responses: usize,
    pub sliced: &'a RawTable,
    pub catalog: &'a QuestionCatalog,
    pub summaries: &'a [QuestionSummary],
    pub from_row: usize,
    pub to_row: usize,
}

impl<'a> ReportContext<'a> {
    pub fn new(
        survey_name: &'a str,
        total_responses: usize,
        sliced: &'a RawTable,
        catalog: &'a QuestionCatalog,
        summaries: &'a [QuestionSummary],
        from_row: usize,
        to_row: usize,
    ) -> ReportContext<'a> {
        ReportContext {
            survey_name,
            total_responses,
            sliced,
            catalog,
            summaries,
            from_row,
            to_row,
        }
    }

    pub fn selected_responses(&self) -> usize {
        self.sliced.num_rows()
    }

    pub fn range_info(&self) -> String {
        format!(
            "Рядки {}–{} (усього {} анкет)",
            self.from_row,
            self.to_row,
            self.selected_responses()
        )
    }

    pub fn overview(&self) -> Vec<QuestionOverview> {
        self.catalog
            .questions()
            .map(|(name, info)| QuestionOverview {
                code: info.code.clone(),
                column: name.clone(),
                qtype: info.qtype.label().to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(qtype: QuestionType, values: &[&str]) -> QuestionSummary {
        let cells: Vec<Cell> = values.iter().map(|s| Cell::text(s)).collect();
        QuestionSummary {
            question: QuestionInfo {
                code: "Q1".to_string(),
                text: "q".to_string(),
                qtype,
            },
            table: frequency_table(&cells).unwrap(),
        }
    }

    #[test]
    fn charts() {
        assert_eq!(
            chart_kind(&summary(QuestionType::Scale, &["1", "5"])),
            ChartKind::Bar
        );
        assert_eq!(
            chart_kind(&summary(QuestionType::Categorical, &["0", "7", "10", "7"])),
            ChartKind::Bar
        );
        assert_eq!(
            chart_kind(&summary(QuestionType::Categorical, &["0", "11", "11"])),
            ChartKind::Pie
        );
        assert_eq!(
            chart_kind(&summary(QuestionType::Binary, &["Так", "Ні"])),
            ChartKind::Pie
        );
        assert_eq!(
            chart_kind(&summary(QuestionType::Categorical, &[])),
            ChartKind::Pie
        );
    }

    #[test]
    fn range_text() {
        let mut b = builder::TableBuilder::with_headers(&["t".to_string(), "q".to_string()]).unwrap();
        b.add_row_text(&["1", "Так"]).unwrap();
        b.add_row_text(&["2", "Ні"]).unwrap();
        let table = b.build().unwrap();
        let catalog = classify_all(&table, 1).unwrap();
        let summaries = summarize(&table, &catalog);
        let ctx = ReportContext::new("s", 10, &table, &catalog, &summaries, 4, 5);
        assert_eq!(ctx.range_info(), "Рядки 4–5 (усього 2 анкет)");
        assert_eq!(
            ctx.overview(),
            vec![QuestionOverview {
                code: "Q1".to_string(),
                column: "q".to_string(),
                qtype: "Дихотомічна (Так/Ні)".to_string(),
            }]
        );
    }
}
