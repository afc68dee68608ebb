//! Date helper functions

use chrono::{DateTime, Datelike, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "D MMMM YYYY") // -> "5 March 2020"
/// format_date(&date, "MMMM Do, YYYY") // -> "March 5th, 2020"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::new();
    for token in tokenize(format) {
        match token {
            Token::Chrono(fmt) => out.push_str(&date.format(fmt).to_string()),
            Token::Ordinal => {
                let day = date.day();
                out.push_str(&format!("{}{}", day, ordinal_suffix(day)));
            }
            Token::Literal(text) => out.push_str(&text),
        }
    }
    out
}

/// Format a date in RFC 3339, as used by Atom feeds
pub fn date_xml<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

#[derive(Debug, PartialEq)]
enum Token {
    Chrono(&'static str),
    Ordinal,
    Literal(String),
}

/// Moment.js tokens, longest first so `MMMM` wins over `MM`
const TOKENS: &[(&str, Option<&str>)] = &[
    ("YYYY", Some("%Y")),
    ("YY", Some("%y")),
    ("MMMM", Some("%B")),
    ("MMM", Some("%b")),
    ("MM", Some("%m")),
    ("M", Some("%-m")),
    ("DDDD", Some("%j")),
    ("Do", None),
    ("DD", Some("%d")),
    ("D", Some("%-d")),
    ("dddd", Some("%A")),
    ("ddd", Some("%a")),
    ("HH", Some("%H")),
    ("H", Some("%-H")),
    ("hh", Some("%I")),
    ("h", Some("%-I")),
    ("mm", Some("%M")),
    ("ss", Some("%S")),
    ("SSS", Some("%3f")),
    ("A", Some("%p")),
    ("a", Some("%P")),
    ("ZZ", Some("%z")),
    ("Z", Some("%:z")),
];

fn tokenize(format: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut rest = format;

    'outer: while let Some(c) = rest.chars().next() {
        // [escaped text]
        if c == '[' {
            if let Some(end) = rest.find(']') {
                literal.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        for (pattern, fmt) in TOKENS {
            if let Some(after) = rest.strip_prefix(pattern) {
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(fmt.map_or(Token::Ordinal, Token::Chrono));
                rest = after;
                continue 'outer;
            }
        }

        literal.push(c);
        rest = &rest[c.len_utf8()..];
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
