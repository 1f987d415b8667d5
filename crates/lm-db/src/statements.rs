//! Splitting of migration scripts into individual statements
//!
//! A `;` ends a statement unless it appears inside a string literal, a quoted
//! identifier, or a comment. Fragments holding only whitespace or comments
//! are dropped.

use std::iter::Peekable;
use std::str::Chars;

/// Split a SQL script into its statements, in source order.
///
/// Each statement is trimmed and has no trailing `;`.
///
/// # Examples
/// ```
/// use lm_db::statements::split_statements;
/// let stmts = split_statements("CREATE TABLE a (x UInt8) ENGINE = Memory; SELECT ';';");
/// assert_eq!(stmts, vec!["CREATE TABLE a (x UInt8) ENGINE = Memory", "SELECT ';'"]);
/// ```
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' | '`' => {
                has_code = true;
                current.push(c);
                copy_quoted(c, &mut chars, &mut current);
            }
            '-' if chars.peek() == Some(&'-') => {
                current.push(c);
                for next in chars.by_ref() {
                    current.push(next);
                    if next == '\n' {
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                current.push(c);
                if let Some(star) = chars.next() {
                    current.push(star);
                }
                let mut prev = '\0';
                for next in chars.by_ref() {
                    current.push(next);
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ';' => flush(&mut statements, &mut current, &mut has_code),
            c => {
                if !c.is_whitespace() {
                    has_code = true;
                }
                current.push(c);
            }
        }
    }
    flush(&mut statements, &mut current, &mut has_code);

    statements
}

/// Copy a quoted run up to and including its closing quote.
///
/// Handles both backslash escapes and doubled quotes.
fn copy_quoted(quote: char, chars: &mut Peekable<Chars<'_>>, current: &mut String) {
    while let Some(c) = chars.next() {
        current.push(c);
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                current.push(escaped);
            }
            continue;
        }
        if c == quote {
            if chars.peek() == Some(&quote) {
                chars.next();
                current.push(quote);
                continue;
            }
            return;
        }
    }
}

fn flush(statements: &mut Vec<String>, current: &mut String, has_code: &mut bool) {
    if *has_code {
        statements.push(current.trim().to_string());
    }
    current.clear();
    *has_code = false;
}

#[cfg(test)]
#[path = "statements_test.rs"]
mod tests;
