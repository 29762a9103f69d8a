use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::FormatOptions;

static HEADER_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)\{([^,]+),").unwrap());

/// Line-based edit: swap the key on the header line and drop unwanted field lines. Every other
/// byte, indentation included, is kept.
pub(super) fn edit_lines(raw: &str, key: Option<&str>, options: &FormatOptions) -> String {
    let lines: Vec<&str> = raw.split('\n').collect();
    let header = lines
        .iter()
        .position(|l| l.trim().starts_with('@') && l.contains('{'));

    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    for (i, line) in lines.iter().enumerate() {
        let line = match key {
            Some(key) if Some(i) == header => HEADER_KEY_RE
                .replace(line, |c: &Captures<'_>| format!("@{}{{{},", &c[1], key)),
            _ => Cow::Borrowed(*line),
        };

        let lower = line.trim().to_lowercase();
        if (options.remove_abstract && lower.starts_with("abstract"))
            || (options.remove_keywords && lower.starts_with("keywords"))
        {
            continue;
        }
        out.push(line);
    }
    out.join("\n")
}
