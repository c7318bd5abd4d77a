//! Wildmat pattern matching (RFC 3977 §4)
//!
//! A wildmat is a comma-separated list of patterns, each optionally
//! prefixed with `!`. The *last* pattern that matches decides: a plain
//! pattern accepts the name, a negated one rejects it. A name no pattern
//! matches is rejected.
//!
//! Within a pattern `*` matches any run of characters and `?` exactly one.
//! The INN extensions `[...]` (with ranges and a leading `^` for negation)
//! and `\` escapes are honoured as well.

/// A parsed wildmat, reusable across many names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wildmat {
    alternatives: Vec<(bool, Vec<char>)>,
}

impl Wildmat {
    /// Parse a wildmat; any string is a valid wildmat
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let alternatives = split_alternatives(pattern)
            .into_iter()
            .map(|alt| match alt.strip_prefix('!') {
                Some(rest) => (true, rest.chars().collect()),
                None => (false, alt.chars().collect()),
            })
            .collect();
        Self { alternatives }
    }

    /// Wildmat matching everything
    #[must_use]
    pub fn any() -> Self {
        Self::new("*")
    }

    /// Test a name against the wildmat
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        let name: Vec<char> = name.chars().collect();
        self.alternatives
            .iter()
            .rev()
            .find(|(_, pattern)| glob_match(pattern, &name))
            .is_some_and(|(negated, _)| !negated)
    }
}

/// Convenience wrapper for one-off matches
#[must_use]
pub fn matches(pattern: &str, name: &str) -> bool {
    Wildmat::new(pattern).matches(name)
}

/// Split on commas that are not escaped or inside a `[...]` class
fn split_alternatives(pattern: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            '[' if !in_class => {
                in_class = true;
                current.push(c);
                // A leading `]` (possibly after `^`) is literal
                if chars.peek() == Some(&'^') {
                    current.push('^');
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    current.push(']');
                    chars.next();
                }
            }
            ']' if in_class => {
                in_class = false;
                current.push(c);
            }
            ',' if !in_class => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts
}

/// Glob match with `*` backtracking
fn glob_match(pattern: &[char], name: &[char]) -> bool {
    let (mut p, mut n) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() {
            match pattern[p] {
                '*' => {
                    star = Some((p, n));
                    p += 1;
                    continue;
                }
                '?' => {
                    p += 1;
                    n += 1;
                    continue;
                }
                '[' => {
                    if let Some((matched, next_p)) = match_class(pattern, p, name[n]) {
                        if matched {
                            p = next_p;
                            n += 1;
                            continue;
                        }
                    } else if name[n] == '[' {
                        // Unterminated class: treat `[` literally
                        p += 1;
                        n += 1;
                        continue;
                    }
                }
                '\\' if p + 1 < pattern.len() => {
                    if pattern[p + 1] == name[n] {
                        p += 2;
                        n += 1;
                        continue;
                    }
                }
                c => {
                    if c == name[n] {
                        p += 1;
                        n += 1;
                        continue;
                    }
                }
            }
        }

        // Mismatch: backtrack to the last `*`, letting it eat one more char
        match star {
            Some((star_p, star_n)) => {
                p = star_p + 1;
                n = star_n + 1;
                star = Some((star_p, star_n + 1));
            }
            None => return false,
        }
    }

    pattern[p..].iter().all(|&c| c == '*')
}

/// Match one char against the class starting at `pattern[start] == '['`
///
/// Returns `(matched, index after the closing ']')`, or `None` when the
/// class is not terminated.
fn match_class(pattern: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negated = pattern.get(i) == Some(&'^');
    if negated {
        i += 1;
    }

    let mut matched = false;
    let mut first = true;
    loop {
        let current = *pattern.get(i)?;
        if current == ']' && !first {
            return Some((matched != negated, i + 1));
        }
        first = false;

        let (low, consumed) = if current == '\\' {
            (*pattern.get(i + 1)?, 2)
        } else {
            (current, 1)
        };
        i += consumed;

        if pattern.get(i) == Some(&'-') && pattern.get(i + 1).is_some_and(|&h| h != ']') {
            let high = *pattern.get(i + 1)?;
            i += 2;
            if low <= c && c <= high {
                matched = true;
            }
        } else if low == c {
            matched = true;
        }
    }
}
