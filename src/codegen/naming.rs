//! Rust identifiers derived from documentation names.

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

/// `TIME_SERIES_INTRADAY` -> `TimeSeriesIntraday`.
pub fn type_ident(function_code: &str) -> String {
    function_code
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(title_case)
        .collect()
}

fn title_case(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Lowercase with every non-alphanumeric character replaced by `_`.
pub fn snake_case(name: &str) -> String {
    let mut snake: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if snake.is_empty() || snake.starts_with(|c: char| c.is_ascii_digit()) {
        snake.insert(0, '_');
    }
    snake
}

/// A snake-case identifier that is safe to use as a field or module name.
pub fn field_ident(name: &str) -> String {
    let snake = snake_case(name);
    if RESERVED_PATH_KEYWORDS.contains(&snake.as_str()) {
        format!("{snake}_")
    } else if KEYWORDS.contains(&snake.as_str()) {
        format!("r#{snake}")
    } else {
        snake
    }
}

/// Field name for an optional parameter, kept visibly apart from required ones.
pub fn optional_field_ident(name: &str) -> String {
    format!("opt_{}", snake_case(name))
}
