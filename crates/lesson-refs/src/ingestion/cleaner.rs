//! Whitespace and typography normalisation for extracted PDF text

use crate::config::{CleanMode, CleaningConfig};

/// Glyph names that leak from PDF fonts without a ToUnicode map
const GLYPH_NAMES: &[(&str, char)] = &[
    // Hyphens and dashes
    ("uni2010", '\u{2010}'),
    ("uni2011", '\u{2011}'),
    ("uni2012", '\u{2012}'),
    ("uni2013", '\u{2013}'),
    ("uni2014", '\u{2014}'),
    // Quotation marks
    ("uni2018", '\u{2018}'),
    ("uni2019", '\u{2019}'),
    ("uni201C", '\u{201C}'),
    ("uni201D", '\u{201D}'),
    // Bullets and symbols
    ("uni2022", '\u{2022}'),
    ("uni2026", '\u{2026}'),
    // Spaces
    ("uni00A0", '\u{00A0}'),
    ("uni2009", '\u{2009}'),
    // Mathematical
    ("uni2212", '\u{2212}'),
    ("uni00D7", '\u{00D7}'),
    ("uni00F7", '\u{00F7}'),
];

/// Characters replaced by plain ASCII approximations
const ASCII_APPROXIMATIONS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2012}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2212}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{2009}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Whitespace as text extraction tools report it: Unicode `White_Space`
/// plus the information separators U+001C..=U+001F.
fn is_separator(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

fn collapse_whitespace(text: &str) -> String {
    text.split(is_separator)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalise extracted text into a single whitespace-collapsed line.
///
/// Trims the whole string, drops blank lines, then collapses every
/// whitespace run (newlines included) to one space.
pub fn clean_text(raw: &str) -> String {
    collapse_whitespace(&join_nonblank_lines(raw))
}

/// Like [`clean_text`] but keeps one line per non-blank source line
pub fn clean_text_preserving_lines(raw: &str) -> String {
    join_nonblank_lines(raw)
        .split('\n')
        .map(collapse_whitespace)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clean according to configuration
pub fn clean_with(raw: &str, config: &CleaningConfig) -> String {
    let normalized;
    let input = if config.normalize_typography {
        normalized = normalize_typography(raw);
        normalized.as_str()
    } else {
        raw
    };

    match config.mode {
        CleanMode::Flatten => clean_text(input),
        CleanMode::PreserveLines => clean_text_preserving_lines(input),
    }
}

/// Strip NUL bytes, resolve leaked glyph names and map typographic
/// characters to ASCII
pub fn normalize_typography(text: &str) -> String {
    let mut result = text.replace('\0', "");

    for (glyph_name, ch) in GLYPH_NAMES {
        if !result.contains(glyph_name) {
            continue;
        }
        let replacement = ch.to_string();
        for pattern in [format!("({})", glyph_name), format!("<{}>", glyph_name)] {
            result = result.replace(&pattern, &replacement);
        }
        result = result.replace(glyph_name, &replacement);
    }

    let mut out = String::with_capacity(result.len());
    for c in result.chars() {
        match ASCII_APPROXIMATIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

fn join_nonblank_lines(raw: &str) -> String {
    raw.trim_matches(is_separator)
        .split('\n')
        .map(|line| line.trim_matches(is_separator))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
