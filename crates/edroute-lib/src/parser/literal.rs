//! List literals stored in the Road to Riches body columns.
//!
//! Saved routes keep each waypoint's body names and subtypes in one cell as
//! `['Sol A 1', "Barnard's Star 2"]`. Items use single quotes unless the text
//! itself contains a single quote and no double quote.

/// Decode a list literal into its items, preserving order.
pub fn parse_list_literal(input: &str) -> Result<Vec<String>, String> {
    let mut chars = input.trim().chars().peekable();
    let mut items = Vec::new();

    if chars.next() != Some('[') {
        return Err(format!("expected '[' at start of {input:?}"));
    }

    loop {
        skip_whitespace(&mut chars);
        match chars.next() {
            Some(']') => break,
            Some(quote @ ('\'' | '"')) => {
                items.push(read_quoted(&mut chars, quote)?);
                skip_whitespace(&mut chars);
                match chars.next() {
                    Some(',') => continue,
                    Some(']') => break,
                    Some(other) => return Err(format!("unexpected {other:?} after list item")),
                    None => return Err("unterminated list".to_string()),
                }
            }
            Some(other) => return Err(format!("unexpected {other:?} in list")),
            None => return Err("unterminated list".to_string()),
        }
    }

    skip_whitespace(&mut chars);
    if let Some(trailing) = chars.next() {
        return Err(format!("unexpected {trailing:?} after list"));
    }
    Ok(items)
}

/// Encode items as a list literal that [`parse_list_literal`] reads back.
pub fn format_list_literal<S: AsRef<str>>(items: &[S]) -> String {
    let rendered = items
        .iter()
        .map(|item| quote(item.as_ref()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{rendered}]")
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn read_quoted(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    quote: char,
) -> Result<String, String> {
    let mut value = String::new();
    loop {
        match chars.next() {
            Some('\\') => match chars.next() {
                Some('n') => value.push('\n'),
                Some('t') => value.push('\t'),
                Some('r') => value.push('\r'),
                Some(escaped) => value.push(escaped),
                None => return Err("dangling escape in list item".to_string()),
            },
            Some(c) if c == quote => return Ok(value),
            Some(c) => value.push(c),
            None => return Err("unterminated list item".to_string()),
        }
    }
}

fn quote(item: &str) -> String {
    let quote = if item.contains('\'') && !item.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(item.len() + 2);
    out.push(quote);
    for c in item.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
