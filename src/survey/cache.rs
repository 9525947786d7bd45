use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::survey::*;

/// The settings that change the content of a report.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct ReportOptions {
    pub survey_name: String,
    pub technical_columns: usize,
    pub with_xlsx: bool,
    pub with_pdf: bool,
    pub pdf_font: Option<String>,
}

/// A rendered report.
#[derive(PartialEq, Debug, Clone)]
pub struct ReportArtifacts {
    /// The pretty-printed JSON summary.
    pub summary: String,
    pub xlsx: Option<Vec<u8>>,
    pub pdf: Option<Vec<u8>>,
}

/// Rendered reports, indexed by a fingerprint of everything they are computed from.
#[derive(Debug, Default)]
pub struct ReportCache {
    entries: HashMap<String, ReportArtifacts>,
    hits: usize,
}

impl ReportCache {
    pub fn new() -> ReportCache {
        ReportCache::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Returns the report for these inputs, computing it only the first time.
    pub fn get_or_try_insert<F>(
        &mut self,
        table: &RawTable,
        from_row: usize,
        to_row: usize,
        options: &ReportOptions,
        compute: F,
    ) -> BSurveyResult<&ReportArtifacts>
    where
        F: FnOnce() -> BSurveyResult<ReportArtifacts>,
    {
        let key = fingerprint(table, from_row, to_row, options)?;
        match self.entries.entry(key) {
            Entry::Occupied(e) => {
                self.hits += 1;
                info!("Report for rows {}-{} served from the cache", from_row, to_row);
                Ok(e.into_mut())
            }
            Entry::Vacant(e) => {
                debug!("cache: computing report {}", e.key());
                let artifacts = compute()?;
                Ok(e.insert(artifacts))
            }
        }
    }
}

/// A sha256 digest of the table contents, the range and the options.
pub fn fingerprint(
    table: &RawTable,
    from_row: usize,
    to_row: usize,
    options: &ReportOptions,
) -> SurveyResult<String> {
    let snapshot =
        serde_json::to_string(&(table, from_row, to_row, options)).context(ParsingJsonSnafu {})?;
    Ok(sha256::digest(snapshot.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_summary::builder::TableBuilder;

    fn table(values: &[&str]) -> RawTable {
        let mut b = TableBuilder::with_headers(&["q".to_string()]).unwrap();
        for v in values {
            b.add_row_text(&[*v]).unwrap();
        }
        b.build().unwrap()
    }

    fn options() -> ReportOptions {
        ReportOptions {
            survey_name: "s".to_string(),
            technical_columns: 0,
            with_xlsx: false,
            with_pdf: false,
            pdf_font: None,
        }
    }

    fn artifacts(s: &str) -> BSurveyResult<ReportArtifacts> {
        Ok(ReportArtifacts {
            summary: s.to_string(),
            xlsx: None,
            pdf: None,
        })
    }

    #[test]
    fn fingerprints() {
        let t = table(&["1", "2"]);
        let f1 = fingerprint(&t, 2, 3, &options()).unwrap();
        assert_eq!(f1, fingerprint(&t.clone(), 2, 3, &options()).unwrap());
        assert_ne!(f1, fingerprint(&t, 2, 2, &options()).unwrap());
        assert_ne!(f1, fingerprint(&table(&["1", "3"]), 2, 3, &options()).unwrap());
        let with_xlsx = ReportOptions {
            with_xlsx: true,
            ..options()
        };
        assert_ne!(f1, fingerprint(&t, 2, 3, &with_xlsx).unwrap());
        let with_font = ReportOptions {
            with_pdf: true,
            pdf_font: Some("DejaVuSans.ttf".to_string()),
            ..options()
        };
        assert_ne!(f1, fingerprint(&t, 2, 3, &with_font).unwrap());
    }

    #[test]
    fn computes_once() {
        let t = table(&["1", "2"]);
        let mut cache = ReportCache::new();
        let a = cache
            .get_or_try_insert(&t, 2, 3, &options(), || artifacts("first"))
            .unwrap()
            .clone();
        assert_eq!(a.summary, "first");
        let b = cache
            .get_or_try_insert(&t, 2, 3, &options(), || panic!("should be cached"))
            .unwrap()
            .clone();
        assert_eq!(b.summary, "first");
        cache
            .get_or_try_insert(&t, 2, 2, &options(), || artifacts("second"))
            .unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let t = table(&["1"]);
        let mut cache = ReportCache::new();
        let res = cache.get_or_try_insert(&t, 2, 2, &options(), || {
            Err(Box::new(SurveyError::NoInputFiles {}))
        });
        assert!(res.is_err());
        assert_eq!(cache.len(), 0);
    }
}
