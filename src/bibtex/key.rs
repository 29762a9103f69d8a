use once_cell::sync::Lazy;
use regex::Regex;

static AUTHOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)author\s*=\s*[{"'](.+?)[}"']"#).unwrap());
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)year\s*=\s*[{"]?([0-9]{4})[}"]?"#).unwrap());
static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+and\s+").unwrap());

/// Surname of the first listed author, letters only.
pub fn first_author_surname(bibtex: &str) -> Option<String> {
    let authors = AUTHOR_RE.captures(bibtex)?.get(1)?.as_str();
    let first = AND_RE.split(authors).next().unwrap_or(authors).trim();

    let surname = match first.split_once(',') {
        // "Last, First"
        Some((last, _)) => last.trim(),
        // "First Last"
        None => first.split_whitespace().last().unwrap_or(""),
    };

    let surname: String = surname.chars().filter(char::is_ascii_alphabetic).collect();
    (!surname.is_empty()).then_some(surname)
}

pub fn year(bibtex: &str) -> Option<&str> {
    YEAR_RE
        .captures(bibtex)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// `<Surname><Year>`, or `None` when either half is missing.
pub fn citation_key(bibtex: &str) -> Option<String> {
    let surname = first_author_surname(bibtex)?;
    let year = year(bibtex)?;
    Some(format!("{surname}{year}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_comma_first() {
        let bib = "@article{x, author = {Smith, John and Doe, Jane}, year = {2023}}";
        assert_eq!(citation_key(bib).as_deref(), Some("Smith2023"));
    }

    #[test]
    fn first_last() {
        let bib = "@article{x,\n  author = {John Ronald Tolkien AND Jane Doe},\n  year = 1954\n}";
        assert_eq!(citation_key(bib).as_deref(), Some("Tolkien1954"));
    }

    #[test]
    fn quoted_values() {
        let bib = "@misc{x, author = \"van der Berg, Anna\", year = \"2019\"}";
        assert_eq!(citation_key(bib).as_deref(), Some("vanderBerg2019"));
    }

    #[test]
    fn non_letters_are_stripped() {
        let bib = "@article{x, author = {Smith-Jones 3rd, P.}, year = {2001}}";
        assert_eq!(citation_key(bib).as_deref(), Some("SmithJonesrd2001"));
        // An apostrophe closes the value early.
        let bib = "@article{x, author = {O'Neil, P.}, year = {2001}}";
        assert_eq!(citation_key(bib).as_deref(), Some("O2001"));
    }

    #[test]
    fn missing_half_gives_no_key() {
        assert!(citation_key("@article{x, author = {Smith, John}}").is_none());
        assert!(citation_key("@article{x, year = {2020}}").is_none());
        assert!(citation_key("").is_none());
    }

    #[test]
    fn surname_without_letters_gives_no_key() {
        assert!(citation_key("@article{x, author = {1234}, year = {2020}}").is_none());
    }

    #[test]
    fn year_must_have_four_digits() {
        assert_eq!(year("year = {99}"), None);
        assert_eq!(year("YEAR={2024}"), Some("2024"));
    }

    #[test]
    fn non_ascii_year_gives_no_key() {
        assert_eq!(year("year = {२०२३}"), None);
        let bib = "@article{foo, author = {Smith, John}, year = {२०२३}}";
        assert!(citation_key(bib).is_none());
    }
}
