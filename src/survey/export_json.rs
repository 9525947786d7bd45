use serde_json::json;

use crate::survey::report::{chart_kind, ReportContext};
use crate::survey::*;

/// The JSON summary of a report.
///
/// The frequency tables keep the column names used by the other reports.
pub fn build_summary_js(ctx: &ReportContext) -> JSValue {
    let results: Vec<JSValue> = ctx
        .summaries
        .iter()
        .map(|qs| {
            json!({
                "question": qs.question,
                "chart": chart_kind(qs),
                "table": qs.table,
            })
        })
        .collect();
    json!({
        "config": {
            "survey": ctx.survey_name,
            "range": ctx.range_info(),
            "fromRow": ctx.from_row,
            "toRow": ctx.to_row,
            "totalResponses": ctx.total_responses,
            "selectedResponses": ctx.selected_responses(),
        },
        "questions": ctx.overview(),
        "results": results,
    })
}
