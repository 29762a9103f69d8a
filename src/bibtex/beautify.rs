use once_cell::sync::Lazy;
use regex::Regex;

use super::FormatOptions;

static HEADER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@(\w+)\s*\{\s*([^,]+),").unwrap());
// A comma only separates fields when a `name =` follows it.
static FIELD_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([a-zA-Z0-9-]+\s*=)").unwrap());
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^([a-zA-Z0-9-]+)\s*=\s*(.*)$").unwrap());

/// Rebuild the entry with one `  name = value,` line per field.
pub(super) fn rebuild(raw: &str, key: Option<&str>, options: &FormatOptions) -> String {
    let (entry_type, current_key) = HEADER_RE
        .captures(raw)
        .map(|c| (c[1].to_string(), c[2].to_string()))
        .unwrap_or_else(|| ("article".to_string(), "key".to_string()));

    let (Some(body_start), Some(body_end)) = (raw.find('{'), raw.rfind('}')) else {
        return raw.to_string();
    };
    if body_end < body_start {
        return raw.to_string();
    }

    let mut body = &raw[body_start + 1..body_end];
    if let Some(comma) = body.find(',') {
        body = &body[comma + 1..];
    }

    let mut out = format!("@{}{{{},\n", entry_type, key.unwrap_or(&current_key));
    for part in split_fields(body) {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some(caps) = FIELD_RE.captures(part) else {
            continue;
        };
        let name = caps[1].to_lowercase();
        let value = caps[2].trim();
        let value = value.strip_suffix(',').map(str::trim).unwrap_or(value);

        if options.drops(&name) {
            continue;
        }
        out.push_str(&format!("  {name} = {value},\n"));
    }
    out.push('}');
    out
}

fn split_fields(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for caps in FIELD_SPLIT_RE.captures_iter(body) {
        let (Some(sep), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        parts.push(&body[start..sep.start()]);
        start = name.start();
    }
    parts.push(&body[start..]);
    parts
}
