//! Glob-style pattern matching
//!
//! Supported syntax:
//! - `*` : any run of bytes, including none
//! - `?` : exactly one byte
//! - `[abc]`, `[a-z]`, `[^a-z]` : byte classes, optionally negated
//! - `\x` : the literal byte `x`
//!
//! Patterns are compiled once with [`GlobPattern::parse`], which rejects
//! malformed input, then applied with the pure [`matches`] function.

use thiserror::Error;

/// Malformed pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobError {
    #[error("unterminated character class")]
    UnterminatedClass,

    #[error("trailing escape character")]
    TrailingEscape,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(u8),
    AnyByte,
    AnyRun,
    Class { negated: bool, items: Vec<ClassItem> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ClassItem {
    Byte(u8),
    Range(u8, u8),
}

impl Token {
    fn accepts(&self, byte: u8) -> bool {
        match self {
            Token::Literal(c) => *c == byte,
            Token::AnyByte => true,
            Token::AnyRun => false,
            Token::Class { negated, items } => {
                let hit = items.iter().any(|item| match *item {
                    ClassItem::Byte(c) => c == byte,
                    ClassItem::Range(lo, hi) => (lo..=hi).contains(&byte),
                });
                hit != *negated
            }
        }
    }
}

/// A compiled glob pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    tokens: Vec<Token>,
}

impl GlobPattern {
    /// Compile a pattern
    pub fn parse(pattern: &[u8]) -> Result<Self, GlobError> {
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < pattern.len() {
            match pattern[i] {
                b'*' => {
                    // Consecutive stars are equivalent to one
                    if tokens.last() != Some(&Token::AnyRun) {
                        tokens.push(Token::AnyRun);
                    }
                    i += 1;
                }
                b'?' => {
                    tokens.push(Token::AnyByte);
                    i += 1;
                }
                b'\\' => {
                    let escaped = *pattern.get(i + 1).ok_or(GlobError::TrailingEscape)?;
                    tokens.push(Token::Literal(escaped));
                    i += 2;
                }
                b'[' => {
                    let (class, next) = parse_class(pattern, i + 1)?;
                    tokens.push(class);
                    i = next;
                }
                c => {
                    tokens.push(Token::Literal(c));
                    i += 1;
                }
            }
        }

        Ok(GlobPattern { tokens })
    }

    /// Pattern matching every candidate (`*`)
    pub fn any() -> Self {
        GlobPattern {
            tokens: vec![Token::AnyRun],
        }
    }

    /// True when the pattern accepts every candidate
    pub fn matches_everything(&self) -> bool {
        self.tokens == [Token::AnyRun]
    }

    /// Check a candidate against this pattern
    pub fn matches(&self, candidate: &[u8]) -> bool {
        matches(self, candidate)
    }
}

/// Parse a `[...]` class whose body starts at `start`
///
/// Returns the token and the index just past the closing bracket.
fn parse_class(pattern: &[u8], start: usize) -> Result<(Token, usize), GlobError> {
    let mut i = start;
    let negated = pattern.get(i) == Some(&b'^');
    if negated {
        i += 1;
    }

    let mut items = Vec::new();
    loop {
        let c = *pattern.get(i).ok_or(GlobError::UnterminatedClass)?;
        match c {
            b']' => return Ok((Token::Class { negated, items }, i + 1)),
            b'\\' => {
                let escaped = *pattern.get(i + 1).ok_or(GlobError::UnterminatedClass)?;
                items.push(ClassItem::Byte(escaped));
                i += 2;
            }
            _ => match (pattern.get(i + 1), pattern.get(i + 2)) {
                (Some(b'-'), Some(&hi)) if hi != b']' => {
                    items.push(ClassItem::Range(c.min(hi), c.max(hi)));
                    i += 3;
                }
                _ => {
                    items.push(ClassItem::Byte(c));
                    i += 1;
                }
            },
        }
    }
}

/// Check whether `candidate` matches `pattern`
///
/// Backtracks only to the most recent `*`, so the cost stays linear in
/// practice and never recurses.
pub fn matches(pattern: &GlobPattern, candidate: &[u8]) -> bool {
    let tokens = &pattern.tokens;
    let mut t = 0;
    let mut i = 0;
    // (token after the last star, candidate position it is retried from)
    let mut star: Option<(usize, usize)> = None;

    while i < candidate.len() {
        match tokens.get(t) {
            Some(Token::AnyRun) => {
                star = Some((t + 1, i));
                t += 1;
                continue;
            }
            Some(token) if token.accepts(candidate[i]) => {
                t += 1;
                i += 1;
                continue;
            }
            _ => {}
        }

        match star {
            Some((after_star, from)) => {
                t = after_star;
                i = from + 1;
                star = Some((after_star, from + 1));
            }
            None => return false,
        }
    }

    tokens[t..].iter().all(|token| *token == Token::AnyRun)
}
