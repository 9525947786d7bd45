use std::collections::HashSet;
use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The names of the columns, from the first row of a sheet.
///
/// Names are trimmed. A column without a name is called `Unnamed: <index>`, and
/// repeated names get a `.1`, `.2`, ... suffix so that every column can be
/// found by its name.
pub fn header_names(raw: &[Option<String>]) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut names: Vec<String> = Vec::new();
    for (idx, h) in raw.iter().enumerate() {
        let base = match h.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => format!("Unnamed: {}", idx),
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        seen.insert(name.clone());
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let raw = vec![
            Some(" Позначка часу ".to_string()),
            None,
            Some("Q".to_string()),
            Some("Q".to_string()),
            Some("  ".to_string()),
            Some("Q".to_string()),
        ];
        assert_eq!(
            header_names(&raw),
            vec!["Позначка часу", "Unnamed: 1", "Q", "Q.1", "Unnamed: 4", "Q.2"]
        );
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("/tmp/some/answers.xlsx"), "answers.xlsx");
        assert_eq!(simplify_file_name("answers.csv"), "answers.csv");
    }
}
