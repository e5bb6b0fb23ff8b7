#![forbid(unsafe_code)]

//! Rescaling of pixel-denominated constraint strings.
//!
//! Layout constraints mix two kinds of tokens:
//!
//! - **Density-sensitive** (rewritten): pixel gaps, insets, padding,
//!   absolute sizes, bracketed column/row size specs.
//! - **Density-resilient** (untouched): percentages, flow keywords such as
//!   `grow`, `fill`, `push`, `wrap`, and anything else the scanner does
//!   not recognize.
//!
//! The rewrite is a single explicit pass over a fixed keyword vocabulary —
//! no regex engine, so matching and replacement order cannot interact. All
//! text outside a rewritten number is preserved byte-for-byte, including
//! whitespace runs and separators.
//!
//! # Performance
//!
//! - **Fast path**: empty input, a factor within epsilon of 1.0, or input
//!   without a single ASCII digit returns the input borrowed, with zero
//!   allocation.
//! - **Slow path**: one linear scan building the rewritten string.
//!
//! # Example
//!
//! ```
//! use std::borrow::Cow;
//! use uiscale_layout::transform;
//!
//! // Fast path - identity factor, returns borrowed
//! let same = transform("insets 10, gap 5", 1.0);
//! assert!(matches!(same, Cow::Borrowed(_)));
//!
//! // Slow path - pixel values rescaled, structure intact
//! let scaled = transform("insets 10, gap 5, width 50%", 2.0);
//! assert_eq!(scaled, "insets 20, gap 10, width 50%");
//! ```

use std::borrow::Cow;

use memchr::memchr;
use uiscale_core::factor::{SCALE_EPSILON, round_scaled};

/// Keyword classes of the constraint mini-language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeywordClass {
    /// 1-2 whitespace-separated numeric arguments.
    Gap,
    /// 1-4 whitespace-separated numeric arguments.
    Edges,
    /// A single value, a forced value (`100!`), or a `min:pref:max` range
    /// with any part left empty.
    Size,
}

fn keyword_class(word: &str) -> Option<KeywordClass> {
    match word {
        "gap" | "gapx" | "gapy" | "gaptop" | "gapbottom" | "gapleft" | "gapright"
        | "gapbefore" | "gapafter" => Some(KeywordClass::Gap),
        "insets" | "pad" => Some(KeywordClass::Edges),
        "width" | "height" | "w" | "h" | "wmin" | "wmax" | "hmin" | "hmax" => {
            Some(KeywordClass::Size)
        }
        _ => None,
    }
}

/// Rewrite every density-sensitive token of `input` for `factor`.
///
/// Numbers are scaled with the shared half-away-from-zero rule and emitted
/// as integers; two-letter unit suffixes stay attached; percentages and
/// unparseable tokens pass through verbatim. Output depends only on
/// `(input, factor)`.
#[must_use]
pub fn transform(input: &str, factor: f64) -> Cow<'_, str> {
    if input.is_empty() || (factor - 1.0).abs() < SCALE_EPSILON {
        return Cow::Borrowed(input);
    }
    if !input.bytes().any(|b| b.is_ascii_digit()) {
        return Cow::Borrowed(input);
    }

    let mut rewriter = Rewriter::new(input, factor);
    rewriter.run();
    if rewriter.matched && rewriter.out != input {
        tracing::trace!(factor, from = %input, to = %rewriter.out, "constraints rescaled");
        Cow::Owned(rewriter.out)
    } else {
        Cow::Borrowed(input)
    }
}

/// Whether `input` contains at least one token the transformer would
/// recognize as density-sensitive, independent of the active factor.
#[must_use]
pub fn has_scalable_values(input: &str) -> bool {
    if input.is_empty() || !input.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut rewriter = Rewriter::new(input, 1.0);
    rewriter.run();
    rewriter.matched
}

struct Rewriter<'a> {
    src: &'a str,
    bytes: &'a [u8],
    factor: f64,
    out: String,
    /// Set once the scanner recognizes any density-sensitive token,
    /// whether or not its text changes.
    matched: bool,
}

impl<'a> Rewriter<'a> {
    fn new(src: &'a str, factor: f64) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            factor,
            out: String::with_capacity(src.len() + 8),
            matched: false,
        }
    }

    fn run(&mut self) {
        let n = self.bytes.len();
        let mut i = 0;
        while i < n {
            let start = i;
            while i < n {
                let b = self.bytes[i];
                if b == b'[' || (b.is_ascii_alphabetic() && self.word_boundary(i)) {
                    break;
                }
                i += 1;
            }
            self.out.push_str(&self.src[start..i]);
            if i >= n {
                break;
            }
            i = if self.bytes[i] == b'[' {
                self.bracket(i)
            } else {
                self.word(i)
            };
        }
    }

    /// A keyword may only start where the previous byte is not part of a
    /// word (mirrors `\b` for the ASCII vocabulary we match).
    fn word_boundary(&self, i: usize) -> bool {
        i == 0 || {
            let prev = self.bytes[i - 1];
            !(prev.is_ascii_alphanumeric() || prev == b'_')
        }
    }

    fn word(&mut self, start: usize) -> usize {
        let n = self.bytes.len();
        let mut i = start;
        while i < n && self.bytes[i].is_ascii_alphabetic() {
            i += 1;
        }
        let word = &self.src[start..i];
        match keyword_class(word) {
            Some(KeywordClass::Gap) => self.numeric_args(start, i, 2),
            Some(KeywordClass::Edges) => self.numeric_args(start, i, 4),
            Some(KeywordClass::Size) => self.size_value(start, i),
            None => {
                // Flow keywords and unknown words pass through here.
                self.out.push_str(word);
                i
            }
        }
    }

    /// `keyword n [n [n [n]]]` — scale up to `max` whitespace-separated
    /// numbers, preserving the exact whitespace between them.
    fn numeric_args(&mut self, word_start: usize, word_end: usize, max: usize) -> usize {
        let n = self.bytes.len();
        let mut i = word_end;
        while i < n && self.bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == word_end || i >= n || !self.bytes[i].is_ascii_digit() {
            self.out.push_str(&self.src[word_start..i]);
            return i;
        }
        self.matched = true;
        self.out.push_str(&self.src[word_start..i]);
        i = self.number_token(i);
        let mut args = 1;
        while args < max {
            let mut j = i;
            while j < n && self.bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j == i || j >= n || !self.bytes[j].is_ascii_digit() {
                break;
            }
            self.out.push_str(&self.src[i..j]);
            i = self.number_token(j);
            args += 1;
        }
        i
    }

    /// `keyword value` where value is a number, a forced number, or a
    /// colon range; a value containing `%` is left verbatim.
    fn size_value(&mut self, word_start: usize, word_end: usize) -> usize {
        let n = self.bytes.len();
        let mut i = word_end;
        while i < n && self.bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == word_end || i >= n {
            self.out.push_str(&self.src[word_start..i]);
            return i;
        }
        let value_start = i;
        let mut has_digit = false;
        let mut has_percent = false;
        while i < n {
            match self.bytes[i] {
                b'0'..=b'9' => has_digit = true,
                b'%' => has_percent = true,
                b'.' | b':' | b'!' => {}
                _ => break,
            }
            i += 1;
        }
        if !has_digit {
            self.out.push_str(&self.src[word_start..i]);
            return i;
        }
        self.matched = true;
        if has_percent {
            self.out.push_str(&self.src[word_start..i]);
            return i;
        }
        self.out.push_str(&self.src[word_start..value_start]);
        let scaled = scale_range_value(&self.src[value_start..i], self.factor);
        self.out.push_str(&scaled);
        i
    }

    /// One number: digits, optional fraction, then either `%` (verbatim)
    /// or an optional attached two-letter unit suffix (preserved).
    fn number_token(&mut self, start: usize) -> usize {
        let n = self.bytes.len();
        let mut i = start;
        while i < n && self.bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i < n && self.bytes[i] == b'.' && i + 1 < n && self.bytes[i + 1].is_ascii_digit() {
            i += 1;
            while i < n && self.bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
        if i < n && self.bytes[i] == b'%' {
            self.out.push_str(&self.src[start..=i]);
            return i + 1;
        }
        let suffix_end = self.unit_suffix_end(i);
        match self.src[start..i].parse::<f64>() {
            Ok(value) => {
                let scaled = round_scaled(value, self.factor);
                self.out.push_str(&scaled.to_string());
                self.out.push_str(&self.src[i..suffix_end]);
            }
            Err(_) => self.out.push_str(&self.src[start..suffix_end]),
        }
        suffix_end
    }

    /// A two-letter unit (`px`, `pt`, ...) counts as attached only when it
    /// is exactly two letters long.
    fn unit_suffix_end(&self, i: usize) -> usize {
        let n = self.bytes.len();
        if i + 1 < n
            && self.bytes[i].is_ascii_alphabetic()
            && self.bytes[i + 1].is_ascii_alphabetic()
            && (i + 2 >= n || !self.bytes[i + 2].is_ascii_alphanumeric())
        {
            i + 2
        } else {
            i
        }
    }

    /// `[n]` / `[n:n:n]`, optionally forced. Content with a percent sign
    /// or any letter is left for the normal scan to copy verbatim.
    fn bracket(&mut self, open: usize) -> usize {
        let Some(rel) = memchr(b']', &self.bytes[open + 1..]) else {
            self.out.push('[');
            return open + 1;
        };
        let close = open + 1 + rel;
        let content = &self.src[open + 1..close];
        if !bracket_is_scalable(content) {
            self.out.push('[');
            return open + 1;
        }
        self.matched = true;
        self.out.push('[');
        self.out.push_str(&scale_range_value(content, self.factor));
        self.out.push(']');
        close + 1
    }
}

fn bracket_is_scalable(content: &str) -> bool {
    if content.is_empty() {
        return false;
    }
    if content
        .bytes()
        .any(|b| b == b'%' || b.is_ascii_alphabetic() || !b.is_ascii())
    {
        return false;
    }
    let body = content.strip_suffix('!').unwrap_or(content);
    if body.is_empty() {
        return false;
    }
    body.split(':').all(is_plain_number)
}

fn is_plain_number(part: &str) -> bool {
    !part.is_empty()
        && part.bytes().any(|b| b.is_ascii_digit())
        && part.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && part.bytes().filter(|&b| b == b'.').count() <= 1
}

/// Scale `100`, `100!`, or `min:pref:max` (empty parts stay empty).
fn scale_range_value(value: &str, factor: f64) -> String {
    let (body, forced) = match value.strip_suffix('!') {
        Some(body) => (body, true),
        None => (value, false),
    };
    let mut out = String::with_capacity(value.len() + 4);
    if body.contains(':') {
        for (idx, part) in body.split(':').enumerate() {
            if idx > 0 {
                out.push(':');
            }
            if !part.is_empty() {
                out.push_str(&scale_numeric_part(part, factor));
            }
        }
    } else if !body.is_empty() {
        out.push_str(&scale_numeric_part(body, factor));
    }
    if forced {
        out.push('!');
    }
    out
}

/// Scale one range part; percentages and unparseable parts come back
/// verbatim, attached two-letter suffixes survive.
fn scale_numeric_part(part: &str, factor: f64) -> String {
    if part.ends_with('%') {
        return part.to_string();
    }
    let bytes = part.as_bytes();
    let (number, suffix) = if bytes.len() > 2
        && bytes[bytes.len() - 1].is_ascii_alphabetic()
        && bytes[bytes.len() - 2].is_ascii_alphabetic()
    {
        part.split_at(part.len() - 2)
    } else {
        (part, "")
    };
    match number.parse::<f64>() {
        Ok(value) => format!("{}{suffix}", round_scaled(value, factor)),
        Err(_) => part.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
