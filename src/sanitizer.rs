// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Poast sanitizer.
//!
//! Untrusted usernames and poast bodies go through two steps:
//! - Truncation to a character limit, on the raw input
//! - Allow-list HTML cleaning (safe formatting tags only, no scripts,
//!   no event handlers, no executable link schemes)
//!
//! The output is a fixed point: sanitizing it again yields the same text.

use crate::config::BoardConfig;
use ammonia::Builder;
use tracing::debug;

/// Sanitizer for user-generated content.
pub struct Sanitizer {
    policy: Builder<'static>,
    max_username_chars: usize,
    max_poast_chars: usize,
}

impl Sanitizer {
    /// Create a sanitizer with the limits from the board configuration.
    pub fn new(config: &BoardConfig) -> Self {
        let mut policy = Builder::default();
        policy.link_rel(Some("noopener noreferrer nofollow"));

        Self {
            policy,
            max_username_chars: config.max_username_chars,
            max_poast_chars: config.max_poast_chars,
        }
    }

    /// Sanitize a raw username and poast body.
    ///
    /// Never fails; either result may be empty.
    pub fn sanitize(&self, raw_username: &str, raw_poast: &str) -> (String, String) {
        (
            self.clean_bounded(raw_username, self.max_username_chars),
            self.clean_bounded(raw_poast, self.max_poast_chars),
        )
    }

    /// Clean `raw` so the result holds at most `limit` characters.
    pub fn clean_bounded(&self, raw: &str, limit: usize) -> String {
        let truncated = truncate_chars(raw, limit);
        let cleaned = self.clean(truncated);
        if cleaned.chars().count() <= limit {
            return cleaned;
        }

        // Escaping grew the text past the limit. Find the longest raw prefix
        // whose cleaned form still fits; the empty prefix always does.
        debug!(limit, "Sanitized text exceeds limit, shortening input");
        let boundaries: Vec<usize> = truncated.char_indices().map(|(i, _)| i).collect();
        let (mut fits, mut overflows) = (0, boundaries.len());
        let mut best = String::new();
        while overflows - fits > 1 {
            let mid = (fits + overflows) / 2;
            let candidate = self.clean(&truncated[..boundaries[mid]]);
            if candidate.chars().count() <= limit {
                fits = mid;
                best = candidate;
            } else {
                overflows = mid;
            }
        }
        best
    }

    fn clean(&self, text: &str) -> String {
        restore_leading_newlines(self.policy.clean(text).to_string())
    }
}

/// Elements whose first newline is swallowed by the HTML parser.
const NEWLINE_EATING_TAGS: &[&str] = &["pre", "listing", "textarea"];

/// Double a newline that directly follows a `<pre>`-like start tag.
///
/// The parser drops one leading newline inside these elements and the
/// serializer does not put it back, so without this every cleaning pass
/// would lose another line. Text `<` is always escaped in cleaned output,
/// so every raw `<` starts a tag.
fn restore_leading_newlines(html: String) -> String {
    if !html.contains('\n') {
        return html;
    }

    let mut out = String::with_capacity(html.len() + 1);
    let mut rest = html.as_str();
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        let Some(end) = start_tag_end(tag) else {
            out.push_str(tag);
            return out;
        };
        let (open, after) = tag.split_at(end);
        out.push_str(open);
        if eats_leading_newline(open) && after.starts_with('\n') {
            out.push('\n');
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Byte index just past the `>` closing the tag at the start of `tag`.
fn start_tag_end(tag: &str) -> Option<usize> {
    let mut quoted = false;
    for (i, c) in tag.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '>' if !quoted => return Some(i + 1),
            _ => {}
        }
    }
    None
}

fn eats_leading_newline(open: &str) -> bool {
    let name = open[1..]
        .split(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
        .next()
        .unwrap_or("");
    NEWLINE_EATING_TAGS
        .iter()
        .any(|tag| tag.eq_ignore_ascii_case(name))
}

/// Cut `text` to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
