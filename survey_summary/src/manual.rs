/*!

This is the long-form manual for `survey_summary` and `survtally`.

## Input formats

The following formats are supported by `survtally`:
* `xlsx` Excel workbooks, as downloaded from Google Forms or Microsoft Forms
* `csv` Comma Separated Values, with a header row

In both cases the first row holds the questions and every following row holds the answers
of one respondent. Several files can be given: they are stacked one after the other and
the columns are matched by their header.

Rows are numbered like in a spreadsheet: the first respondent is on row 2.

## Question types

The type of a question is inferred from the distinct answers of its column, ignoring
the missing answers. The rules are applied in this order:

| Type | Rule |
|------|------|
| `Шкальна (1–5)` | all the answers are 1, 2, 3, 4 or 5 |
| `Дихотомічна (Так/Ні)` | all the answers are yes, no or don't know (Ukrainian or English, any case) |
| `Категоріальна` | at most 15 distinct answers, and at most 7 distinct answers for every 10 answers |
| `Відкрита / текстова` | anything else, including a column without answers |

The first column is considered technical (`Технічне поле`, code `-`) and is not analysed.
This can be changed with `--technical-columns`.

A rating scale from 0 to 10 is not detected as a scale. It will usually be classified as
categorical. The charts will still be drawn as bar charts.

## Frequency tables

Every closed question gets a table with the columns `Варіант відповіді` (the answer),
`Кількість` (the number of respondents) and `%`. The answers are only trimmed: `Так` and
`так` are counted separately. The rows are sorted alphabetically. The percentages are
rounded to one decimal, halves going to the even digit (6.25 gives 6.2), and may not add
up to exactly 100.

Cells marked `#N/A` by the spreadsheet are missing answers. The other error markers
(`#DIV/0!`, `#REF!`, ...) are counted as answers. A column that cannot be counted at all
gets an empty table. This does not affect the other questions.

## Configuration

```json
{
  "outputSettings": {
    "surveyName": "Course evaluation",
    "outputDirectory": "out",
    "pdfFont": "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
  },
  "fileSources": [
    { "provider": "xlsx", "filePath": "responses.xlsx", "excelWorksheetName": "Form responses 1" }
  ],
  "technicalColumns": 1,
  "reports": [
    { "fromRow": 2, "toRow": 41, "summaryFile": "group_a.json", "xlsxFile": "group_a.xlsx" },
    { "fromRow": 42, "summaryFile": "group_b.json", "pdfFile": "group_b.pdf" }
  ]
}
```

The PDF report needs a TrueType font with Cyrillic glyphs (`pdfFont`). Without one, a few
usual system locations are tried, and as a last resort the report is written with a
built-in font that only shows the Latin text.

Paths are relative to the directory of the configuration file. All the command line flags
take precedence over the configuration file.

*/
