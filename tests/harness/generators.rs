// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for poast payloads.

/// Markup injection payloads that must never survive sanitization.
///
/// Each payload carries its executable part only inside tags or attributes.
pub fn xss_payloads() -> Vec<&'static str> {
    vec![
        "<script>alert(1)</script>",
        "<SCRIPT SRC=//evil.example/x.js></SCRIPT>",
        "<img src=x onerror=alert(1)>",
        "<svg onload=alert(1)>",
        "<body onload=alert(1)>",
        r#"<a href="javascript:alert(1)">click</a>"#,
        r#"<a href="JaVaScRiPt:alert(1)">click</a>"#,
        r#"<iframe src="javascript:alert(1)"></iframe>"#,
        r#"<div style="background:url(javascript:alert(1))">x</div>"#,
        r#"<p onclick="steal()">para</p>"#,
        r#"<math><mi xlink:href="javascript:alert(1)">x</mi></math>"#,
        "<<script>script>alert(1)<</script>/script>",
        r#"<object data="javascript:alert(1)"></object>"#,
        "<style>body { display: none }</style>hidden",
    ]
}

/// Fragments that must not appear in any sanitized output of [`xss_payloads`].
pub fn forbidden_fragments() -> Vec<&'static str> {
    vec!["<script", "onerror", "onload", "onclick", "javascript:", "<iframe", "<style", "<object"]
}

/// Formatting that the allow-list keeps intact.
pub fn safe_markup() -> Vec<&'static str> {
    vec![
        "<b>bold</b>",
        "<i>italic</i>",
        "<em>emphasis</em>",
        "<strong>strong</strong>",
        "<code>code</code>",
        "<blockquote>quote</blockquote>",
    ]
}

/// Distinct usernames for bulk submission.
pub fn usernames(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("user{i}")).collect()
}

/// A poast body of exactly `len` characters, with multi-byte characters mixed in.
pub fn long_poast(len: usize) -> String {
    (0..len).map(|i| if i % 3 == 0 { 'é' } else { 'x' }).collect()
}
