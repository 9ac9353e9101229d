/*!
format.rs

Terminal formatting for the primary (stdout) output path.

Goals:
  - Pretty-print JSON documents one per response/event.
  - Syntax-highlight only when stdout is a real terminal; piped output
    must never carry ANSI sequences.
  - Respect NO_COLOR.
  - Keep zero non-std dependencies (no terminal crates).

Public API:
  - StyleOptions::detect()
  - color(role, text, &StyleOptions) -> String
  - highlight_json(&str, &StyleOptions) -> String
  - print_json(&impl Serialize, &StyleOptions)
*/

use std::io::IsTerminal;

use serde::Serialize;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub struct StyleOptions {
    pub use_color: bool,
}

impl StyleOptions {
    /// Color only on a TTY with NO_COLOR unset.
    pub fn detect() -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        StyleOptions {
            use_color: !no_color && std::io::stdout().is_terminal(),
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color Roles                                                                */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    /// Object keys
    Key,
    /// String values
    Str,
    /// Numbers
    Num,
    /// true / false / null
    Lit,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Key => "38;5;45",  // cyan-ish
        Role::Str => "38;5;82",  // green
        Role::Num => "38;5;214", // orange
        Role::Lit => "38;5;213", // magenta/pink
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* JSON Highlighting                                                          */
/* -------------------------------------------------------------------------- */

/// Minimal JSON syntax coloring over an already pretty-printed document.
/// Structure characters pass through unstyled; a string is a key when the
/// next non-whitespace character is `:`.
pub fn highlight_json(src: &str, style: &StyleOptions) -> String {
    if !style.use_color {
        return src.to_string();
    }

    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len() + 64);
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                let end = string_end(bytes, i);
                let literal = &src[i..end];
                let role = if is_key(bytes, end) { Role::Key } else { Role::Str };
                out.push_str(&color(role, literal, style));
                i = end;
            }
            b'-' | b'0'..=b'9' => {
                let end = number_end(bytes, i);
                out.push_str(&color(Role::Num, &src[i..end], style));
                i = end;
            }
            b't' | b'f' | b'n' => {
                let end = word_end(bytes, i);
                let word = &src[i..end];
                match word {
                    "true" | "false" | "null" => out.push_str(&color(Role::Lit, word, style)),
                    _ => out.push_str(word),
                }
                i = end;
            }
            _ => {
                // structure / whitespace; char_len keeps multi-byte input intact
                let end = i + char_len(bytes[i]);
                out.push_str(&src[i..end]);
                i = end;
            }
        }
    }
    out
}

/// End index (exclusive) of a string literal starting at `start`.
fn string_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Whether the string ending at `end` is an object key.
fn is_key(bytes: &[u8], end: usize) -> bool {
    bytes[end..]
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b':')
}

fn number_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < bytes.len() && matches!(bytes[i], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-') {
        i += 1;
    }
    i
}

fn word_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
    }
    i
}

fn char_len(first: u8) -> usize {
    match first {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    }
}

/* -------------------------------------------------------------------------- */
/* Printing                                                                   */
/* -------------------------------------------------------------------------- */

/// Pretty-print one JSON document to stdout, highlighted on TTYs.
pub fn print_json<T: Serialize>(value: &T, style: &StyleOptions) {
    let pretty =
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unserializable>".to_string());
    println!("{}", highlight_json(&pretty, style));
}

/* --------------------------------- Tests ---------------------------------- */
