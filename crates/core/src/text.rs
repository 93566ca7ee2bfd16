//! String helpers for RIDB free text
//!
//! RIDB names arrive in SHOUTING CASE, descriptions arrive as entity-escaped HTML,
//! and campsite numbers arrive zero-padded. These functions clean them up for
//! display.

use std::sync::OnceLock;

use regex::Regex;

/// ASCII word characters, matching `\w` in a JavaScript regex
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase everything, then uppercase the first word character after every
/// word boundary: `"MAX NUM OF PEOPLE"` becomes `"Max Num Of People"`.
pub fn title_case(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut previous_is_word = false;

    for c in input.to_lowercase().chars() {
        let is_word = is_word_char(c);
        if is_word && !previous_is_word {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        previous_is_word = is_word;
    }

    result
}

/// Title case that understands hyphens and apostrophes:
/// `"east-west"` → `"East-West"`, `"o'neill"` → `"O'Neill"`.
pub fn smart_title_case(input: &str) -> String {
    input
        .split_whitespace()
        .map(|word| {
            word.split('-')
                .map(capitalize_part)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_part(part: &str) -> String {
    let mut result = String::with_capacity(part.len());
    let mut after_apostrophe = false;

    for (idx, c) in part.to_lowercase().chars().enumerate() {
        if (idx == 0 || after_apostrophe) && c.is_ascii_lowercase() {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
        after_apostrophe = c == '\'';
    }

    result
}

/// Decode HTML entities, including the literal `\u003C`-style escapes RIDB
/// sometimes leaves in descriptions.
pub fn decode_html_entities(input: &str) -> String {
    static RE_ESCAPED: OnceLock<Regex> = OnceLock::new();
    let re_escaped =
        RE_ESCAPED.get_or_init(|| Regex::new(r"(?i)\\u00(3c|3e|26)").expect("valid regex"));

    let unescaped = re_escaped.replace_all(input, |caps: &regex::Captures| {
        match caps[1].to_ascii_lowercase().as_str() {
            "3c" => "<",
            "3e" => ">",
            _ => "&",
        }
        .to_string()
    });

    html_escape::decode_html_entities(&unescaped).replace('\u{a0}', " ")
}

/// Convert messy HTML into readable plain text.
///
/// Scripts and styles are dropped, `<br>`, `<hr>` and `</p>` become line breaks,
/// every other tag is removed, and runs of whitespace collapse.
pub fn html_to_text(input: &str) -> String {
    static RE_SCRIPT: OnceLock<Regex> = OnceLock::new();
    static RE_STYLE: OnceLock<Regex> = OnceLock::new();
    static RE_BREAK: OnceLock<Regex> = OnceLock::new();
    static RE_PARAGRAPH_END: OnceLock<Regex> = OnceLock::new();
    static RE_TAG: OnceLock<Regex> = OnceLock::new();
    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    static RE_NEWLINE: OnceLock<Regex> = OnceLock::new();
    static RE_BLANK_LINES: OnceLock<Regex> = OnceLock::new();

    if input.is_empty() {
        return String::new();
    }

    let decoded = decode_html_entities(input);

    let re_script =
        RE_SCRIPT.get_or_init(|| Regex::new(r"(?is)<script.*?</script>").expect("valid regex"));
    let re_style =
        RE_STYLE.get_or_init(|| Regex::new(r"(?is)<style.*?</style>").expect("valid regex"));
    let re_break =
        RE_BREAK.get_or_init(|| Regex::new(r"(?i)<(?:br|hr)\s*/?>").expect("valid regex"));
    let re_paragraph_end =
        RE_PARAGRAPH_END.get_or_init(|| Regex::new(r"(?i)</p>").expect("valid regex"));
    let re_tag = RE_TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"));
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"));
    let re_newline = RE_NEWLINE.get_or_init(|| Regex::new(r"\s*\n\s*").expect("valid regex"));
    let re_blank_lines =
        RE_BLANK_LINES.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"));

    let text = re_script.replace_all(&decoded, "");
    let text = re_style.replace_all(&text, "");
    let text = re_break.replace_all(&text, "\n");
    let text = re_paragraph_end.replace_all(&text, "\n");
    let text = re_tag.replace_all(&text, "");
    let text = text.replace('\r', "");
    let text = re_spaces.replace_all(&text, " ");
    let text = re_newline.replace_all(&text, "\n");
    let text = re_blank_lines.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Default character budget for [`embedding_text`]
pub const EMBEDDING_MAX_CHARS: usize = 4000;

/// Single-line plain text, capped at `max_chars` characters
pub fn embedding_text(input: &str, max_chars: usize) -> String {
    let flat = html_to_text(input)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => flat[..cut].to_string(),
        None => flat,
    }
}

/// Canonical site number: uppercase alphanumerics only, with leading zeros
/// stripped from every digit run (`"007"` → `"7"`, `"a-01"` → `"A1"`).
pub fn normalize_site_number(site_number: &str) -> String {
    let alphanumeric: String = site_number
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect();

    let mut result = String::with_capacity(alphanumeric.len());
    let mut digits = String::new();

    for c in alphanumeric.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            flush_digits(&mut result, &mut digits);
            result.push(c);
        }
    }
    flush_digits(&mut result, &mut digits);

    result
}

fn flush_digits(result: &mut String, digits: &mut String) {
    if digits.is_empty() {
        return;
    }
    let stripped = digits.trim_start_matches('0');
    result.push_str(if stripped.is_empty() { "0" } else { stripped });
    digits.clear();
}
