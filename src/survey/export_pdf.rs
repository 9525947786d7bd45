// The PDF report: the counts and the range, then a table and a chart for every
// question that has answers.

use std::f32::consts::PI;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::survey::report::{chart_kind, ChartKind, ReportContext};
use crate::survey::*;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const ROW_HEIGHT: f32 = 7.0;
const VALUE_WIDTH: f32 = 110.0;
const NUMBER_WIDTH: f32 = 30.0;
const MAX_VALUE_CHARS: usize = 60;
const TITLE_CHARS: usize = 80;

const CHART_HEIGHT: f32 = 70.0;
const CHART_LEFT: f32 = 35.0;
const CHART_WIDTH: f32 = 140.0;
const PIE_RADIUS: f32 = 28.0;
const LEGEND_LINE: f32 = 6.0;

/// Fonts with Cyrillic glyphs that are found on most systems.
const SYSTEM_FONTS: [&str; 4] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const PALETTE: [(u8, u8, u8); 6] = [
    (0x4F, 0x81, 0xBD),
    (0xC0, 0x50, 0x4D),
    (0x9B, 0xBB, 0x59),
    (0x80, 0x64, 0xA2),
    (0x4B, 0xAC, 0xC6),
    (0xF7, 0x96, 0x46),
];

/// Renders the report on A4 pages.
///
/// The text needs a TrueType font with Cyrillic glyphs: `font_path`, or one of the
/// usual system fonts. Without any, the built-in Helvetica font is used and the
/// Ukrainian text is replaced by English labels.
pub fn build_pdf_report(ctx: &ReportContext, font_path: Option<&str>) -> BSurveyResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        ctx.survey_name,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let (font, unicode) = load_font(&doc, font_path)?;
    let mut w = PdfWriter {
        doc: &doc,
        layer: doc.get_page(page).get_layer(layer),
        font,
        unicode,
        y: 0.0,
        pages: 1,
    };
    w.decorate();

    let title = w.safe("Звіт про результати", "Survey Results Report");
    w.text(&title, 16.0, 10.0);
    let name = w.safe(ctx.survey_name, "");
    if !name.is_empty() {
        w.text(&name, 12.0, 8.0);
    }
    let (counts, range) = if unicode {
        (
            format!(
                "Всього: {} | Оброблено: {}",
                ctx.total_responses,
                ctx.selected_responses()
            ),
            ctx.range_info(),
        )
    } else {
        (
            format!(
                "Total: {} | Processed: {}",
                ctx.total_responses,
                ctx.selected_responses()
            ),
            format!("Rows {}-{}", ctx.from_row, ctx.to_row),
        )
    };
    w.text(&counts, 12.0, 8.0);
    w.text(&range, 12.0, 8.0);
    w.y -= 5.0;

    for qs in ctx.summaries.iter().filter(|qs| !qs.table.is_empty()) {
        w.question(qs);
    }
    let pages = w.pages;
    drop(w);

    let bytes = doc.save_to_bytes().context(WritingPdfSnafu {})?;
    debug!("build_pdf_report: {} pages, {} bytes", pages, bytes.len());
    Ok(bytes)
}

/// The font of the report, and whether it can display Cyrillic text.
fn load_font(
    doc: &PdfDocumentReference,
    font_path: Option<&str>,
) -> BSurveyResult<(IndirectFontRef, bool)> {
    let path: Option<String> = match font_path {
        Some(p) => Some(p.to_string()),
        None => SYSTEM_FONTS
            .iter()
            .find(|p| Path::new(**p).exists())
            .map(|p| p.to_string()),
    };
    match path {
        Some(p) => {
            debug!("load_font: {:?}", p);
            let f = fs::File::open(&p).context(OpeningFontSnafu { path: p.clone() })?;
            let font = doc.add_external_font(f).context(WritingPdfSnafu {})?;
            Ok((font, true))
        }
        None => {
            warn!("No font with Cyrillic glyphs found, the PDF report will only show Latin text. Use --pdf-font to set one.");
            let font = doc
                .add_builtin_font(BuiltinFont::Helvetica)
                .context(WritingPdfSnafu {})?;
            Ok((font, false))
        }
    }
}

struct PdfWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    unicode: bool,
    /// Distance of the cursor from the bottom of the page.
    y: f32,
    pages: usize,
}

impl<'a> PdfWriter<'a> {
    fn new_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.pages += 1;
        self.decorate();
    }

    // Running header and page number.
    fn decorate(&mut self) {
        let header = self.safe("Звіт про результати опитування", "Survey report");
        self.layer.set_fill_color(black());
        self.layer.use_text(
            header,
            10.0,
            Mm(PAGE_WIDTH - MARGIN - 70.0),
            Mm(PAGE_HEIGHT - 12.0),
            &self.font,
        );
        self.layer.use_text(
            format!("Page {}", self.pages),
            8.0,
            Mm(PAGE_WIDTH / 2.0 - 5.0),
            Mm(10.0),
            &self.font,
        );
        self.y = PAGE_HEIGHT - MARGIN - 5.0;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.new_page();
        }
    }

    fn text(&mut self, s: &str, size: f32, height: f32) {
        self.ensure_space(height);
        self.layer
            .use_text(s, size, Mm(MARGIN), Mm(self.y - height + 2.0), &self.font);
        self.y -= height;
    }

    fn safe(&self, s: &str, fallback: &str) -> String {
        if self.unicode || s.is_ascii() {
            s.to_string()
        } else {
            fallback.to_string()
        }
    }

    fn label(&self, value: &str, max_chars: usize) -> String {
        let short: String = value.chars().take(max_chars).collect();
        self.safe(&short, "[Text]")
    }

    fn question(&mut self, qs: &QuestionSummary) {
        self.ensure_space(10.0 + 3.0 * ROW_HEIGHT);
        let title = if self.unicode {
            format!("{}. {}", qs.question.code, qs.question.text)
        } else {
            format!("Question Code: {}", qs.question.code)
        };
        for line in wrap(&title, TITLE_CHARS) {
            self.text(&line, 12.0, 6.0);
        }
        self.y -= 2.0;

        if self.unicode {
            self.table_row(["Варіант", "Кільк.", "%"]);
        } else {
            self.table_row(["Option", "Count", "%"]);
        }
        for r in qs.table.rows.iter() {
            let value = self.label(&r.value, MAX_VALUE_CHARS);
            let count = r.count.to_string();
            let percent = format!("{:.1}", r.percent);
            self.table_row([value.as_str(), count.as_str(), percent.as_str()]);
        }
        self.y -= 5.0;

        match chart_kind(qs) {
            ChartKind::Bar => self.bar_chart(&qs.table),
            ChartKind::Pie => self.pie_chart(&qs.table),
        }
        self.y -= 10.0;
    }

    fn table_row(&mut self, cells: [&str; 3]) {
        self.ensure_space(ROW_HEIGHT);
        let top = self.y;
        let bottom = self.y - ROW_HEIGHT;
        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.5);
        let mut x = MARGIN;
        for (width, cell) in [VALUE_WIDTH, NUMBER_WIDTH, NUMBER_WIDTH].iter().zip(cells) {
            self.layer.add_line(Line {
                points: corners(x, bottom, x + width, top),
                is_closed: true,
            });
            self.layer
                .use_text(cell, 10.0, Mm(x + 1.5), Mm(bottom + 2.0), &self.font);
            x += width;
        }
        self.y = bottom;
    }

    fn bar_chart(&mut self, table: &FrequencyTable) {
        self.ensure_space(CHART_HEIGHT);
        let bottom = self.y - CHART_HEIGHT + 10.0;
        let plot_height = CHART_HEIGHT - 20.0;
        let max = table.rows.iter().map(|r| r.count).max().unwrap_or(0).max(1) as f32;
        let slot = CHART_WIDTH / table.len().max(1) as f32;

        self.layer.set_outline_color(black());
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(CHART_LEFT), Mm(bottom)), false),
                (Point::new(Mm(CHART_LEFT + CHART_WIDTH), Mm(bottom)), false),
            ],
            is_closed: false,
        });
        for (i, r) in table.rows.iter().enumerate() {
            let height = plot_height * r.count as f32 / max;
            let x = CHART_LEFT + slot * i as f32 + slot * 0.2;
            self.layer.set_fill_color(rgb(PALETTE[0]));
            self.layer
                .add_polygon(filled(corners(x, bottom, x + slot * 0.6, bottom + height)));
            self.layer.set_fill_color(black());
            self.layer.use_text(
                r.count.to_string(),
                9.0,
                Mm(x + slot * 0.3 - 1.5),
                Mm(bottom + height + 1.5),
                &self.font,
            );
            let label = self.label(&r.value, 12);
            self.layer
                .use_text(label, 8.0, Mm(x), Mm(bottom - 5.0), &self.font);
        }
        self.y -= CHART_HEIGHT;
    }

    fn pie_chart(&mut self, table: &FrequencyTable) {
        let height = CHART_HEIGHT.max(10.0 + table.len() as f32 * LEGEND_LINE);
        self.ensure_space(height);
        let cx = CHART_LEFT + PIE_RADIUS;
        let cy = self.y - CHART_HEIGHT / 2.0;
        let legend_x = cx + PIE_RADIUS + 15.0;
        let total = table.total().max(1) as f32;

        // Counterclockwise from the top.
        let mut start = PI / 2.0;
        for (i, r) in table.rows.iter().enumerate() {
            let sweep = 2.0 * PI * r.count as f32 / total;
            let color = rgb(PALETTE[i % PALETTE.len()]);
            self.layer.set_fill_color(color.clone());
            self.layer.add_polygon(wedge(cx, cy, PIE_RADIUS, start, sweep));
            start += sweep;

            let ly = self.y - 8.0 - i as f32 * LEGEND_LINE;
            self.layer.set_fill_color(color);
            self.layer
                .add_polygon(filled(corners(legend_x, ly, legend_x + 4.0, ly + 4.0)));
            self.layer.set_fill_color(black());
            let label = format!("{} ({:.1}%)", self.label(&r.value, 40), r.percent);
            self.layer
                .use_text(label, 8.0, Mm(legend_x + 6.0), Mm(ly + 0.5), &self.font);
        }
        self.y -= height;
    }
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn corners(x1: f32, y1: f32, x2: f32, y2: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(x1), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y1)), false),
        (Point::new(Mm(x2), Mm(y2)), false),
        (Point::new(Mm(x1), Mm(y2)), false),
    ]
}

fn filled(points: Vec<(Point, bool)>) -> Polygon {
    Polygon {
        rings: vec![points],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}

// A pie slice, the arc approximated every 5 degrees.
fn wedge(cx: f32, cy: f32, radius: f32, start: f32, sweep: f32) -> Polygon {
    let steps = ((sweep / (PI / 36.0)).ceil() as usize).max(1);
    let mut points = vec![(Point::new(Mm(cx), Mm(cy)), false)];
    for k in 0..=steps {
        let a = start + sweep * k as f32 / steps as f32;
        points.push((
            Point::new(Mm(cx + radius * a.cos()), Mm(cy + radius * a.sin())),
            false,
        ));
    }
    filled(points)
}

/// Splits a text on spaces into lines of at most `width` characters. Long words are kept whole.
fn wrap(s: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey(n_questions: usize) -> (RawTable, QuestionCatalog, Vec<QuestionSummary>) {
        let mut headers = vec!["Позначка часу".to_string()];
        for q in 0..n_questions {
            headers.push(format!("Питання {}", q + 1));
        }
        headers.push("Коментар".to_string());
        let mut b = builder::TableBuilder::with_headers(&headers).unwrap();
        let answers = ["Так", "Ні", "Так", "Не знаю"];
        for i in 0..8 {
            let mut row: Vec<String> = vec![format!("10:0{}", i)];
            for q in 0..n_questions {
                if q % 2 == 0 {
                    row.push(((i + q) % 5 + 1).to_string());
                } else {
                    row.push(answers[i % 4].to_string());
                }
            }
            row.push(format!("коментар {}", i));
            let refs: Vec<&str> = row.iter().map(|s| s.as_str()).collect();
            b.add_row_text(&refs).unwrap();
        }
        let table = b.build().unwrap();
        let catalog = classify_all(&table, 1).unwrap();
        let summaries = summarize(&table, &catalog);
        (table, catalog, summaries)
    }

    #[test]
    fn renders_all_the_questions() {
        let (table, catalog, summaries) = survey(6);
        assert_eq!(summaries.len(), 6);
        let ctx = ReportContext::new("Курс", 8, &table, &catalog, &summaries, 2, 9);
        let bytes = build_pdf_report(&ctx, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() >= 2);
    }

    #[test]
    fn single_page() {
        let (table, catalog, summaries) = survey(1);
        let ctx = ReportContext::new("Course", 8, &table, &catalog, &summaries, 2, 9);
        let bytes = build_pdf_report(&ctx, None).unwrap();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn missing_font() {
        let (table, catalog, summaries) = survey(1);
        let ctx = ReportContext::new("Курс", 8, &table, &catalog, &summaries, 2, 9);
        let res = build_pdf_report(&ctx, Some("/nonexistent/font.ttf")).map_err(|e| *e);
        assert!(matches!(res, Err(SurveyError::OpeningFont { .. })));
    }

    #[test]
    fn wrapping() {
        assert_eq!(wrap("", 10), vec![""]);
        assert_eq!(wrap("Q1. Оцініть курс", 80), vec!["Q1. Оцініть курс"]);
        assert_eq!(
            wrap("Чи рекомендуєте ви цей курс колегам", 16),
            vec!["Чи рекомендуєте", "ви цей курс", "колегам"]
        );
        assert_eq!(wrap("abcdefghij", 4), vec!["abcdefghij"]);
    }
}
