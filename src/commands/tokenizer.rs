//! Input tokenization.
//!
//! Two views of a line are needed:
//! - [`SplitLine`] splits on whitespace but remembers where each token sits,
//!   so `Free` and `Parser` commands can receive the raw remainder of the line
//!   with its internal spacing intact.
//! - [`split_args`] turns a remainder into an argument vector for external
//!   programs, honouring quotes and escape sequences.

type Chars<'a> = std::iter::Peekable<std::str::Chars<'a>>;

/// A trimmed input line split on whitespace, with token positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLine<'a> {
    line: &'a str,
    spans: Vec<(usize, usize)>,
}

impl<'a> SplitLine<'a> {
    /// Trims `input` and records the byte span of every token.
    pub fn new(input: &'a str) -> Self {
        let line = input.trim();
        let mut spans = Vec::new();
        let mut start = None;

        for (idx, c) in line.char_indices() {
            match (c.is_whitespace(), start) {
                (true, Some(s)) => {
                    spans.push((s, idx));
                    start = None;
                }
                (false, None) => start = Some(idx),
                _ => {}
            }
        }
        if let Some(s) = start {
            spans.push((s, line.len()));
        }

        Self { line, spans }
    }

    /// The trimmed line.
    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns token `index`.
    pub fn token(&self, index: usize) -> Option<&'a str> {
        let line = self.line;
        self.spans.get(index).map(|&(start, end)| &line[start..end])
    }

    /// Iterates over all tokens.
    pub fn tokens(&self) -> impl Iterator<Item = &'a str> + '_ {
        let line = self.line;
        self.spans.iter().map(move |&(start, end)| &line[start..end])
    }

    /// Text following token `index`, including the separating whitespace.
    pub fn suffix_after(&self, index: usize) -> &'a str {
        let line = self.line;
        match self.spans.get(index) {
            Some(&(_, end)) => &line[end..],
            None => "",
        }
    }

    /// Text following token `index` and the single separator character after
    /// it. Any further whitespace is kept, so `echo  a   b` yields ` a   b`.
    pub fn remainder_after(&self, index: usize) -> &'a str {
        let suffix = self.suffix_after(index);
        let mut chars = suffix.chars();
        match chars.next() {
            Some(_) => chars.as_str(),
            None => "",
        }
    }
}

/// Splits an argument string into an argument vector.
///
/// Handles:
/// - Whitespace-separated words
/// - Double-quoted strings: `"hello world"` → `hello world`
/// - Single-quoted strings: `'hello world'` → `hello world`
/// - Escape sequences in quotes: `"say \"hi\""` → `say "hi"`
/// - Quotes in the middle of a word: `--name="a b"` → `--name=a b`
/// - Empty quotes as an empty argument: `""` → ``
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        args.push(collect_word_or_quoted(&mut chars));
    }

    args
}

/// Collects a word, handling quoted sections.
fn collect_word_or_quoted(chars: &mut Chars<'_>) -> String {
    let mut result = String::new();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            break;
        }

        chars.next();
        if c == '"' || c == '\'' {
            result.push_str(&collect_quoted(chars, c));
            continue;
        }

        result.push(c);
    }

    result
}

/// Collects characters inside quotes, handling escape sequences.
fn collect_quoted(chars: &mut Chars<'_>, quote: char) -> String {
    let mut result = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if escaped {
            match c {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                'r' => result.push('\r'),
                '\\' => result.push('\\'),
                '"' => result.push('"'),
                '\'' => result.push('\''),
                _ => {
                    // Unknown escape, keep as-is
                    result.push('\\');
                    result.push(c);
                }
            }
            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            continue;
        }

        if c == quote {
            break;
        }

        result.push(c);
    }

    result
}
