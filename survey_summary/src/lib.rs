/*!
Classification of survey questions and frequency tables of their answers.

The input is a table of responses, as exported by online forms: one column per
question, one row per respondent, the first column(s) holding metadata such as the
submission time.

Two steps, in this order:
* [`classify_all`] gives a [`QuestionType`] and a code (`Q1`, `Q2`, ...) to every column,
* [`summarize`] counts the answers of every closed question (scale, binary, categorical).

Both functions are pure: they never modify the table and always return the same
output for the same input.

See the [manual](manual/index.html) for the details of the rules.
*/

mod classification;
mod model;
mod summary;
mod table;

pub mod builder;
pub mod manual;

pub use crate::classification::{classify, classify_all};
pub use crate::model::*;
pub use crate::summary::{frequency_table, summarize};
pub use crate::table::{Cell, Column, RawTable};
