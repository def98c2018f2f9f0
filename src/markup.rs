//! Pseudo-markdown formatting for assistant replies.
//!
//! The backend's replies use a three-marker subset of markdown: triple
//! asterisks for standalone emphasized spans, double asterisks for bold,
//! single asterisks for italic. This module turns reply text into display
//! markup by escaping HTML metacharacters and then applying an ordered rule
//! table.
//!
//! Rule precedence (triple before double before single) is an invariant:
//! reordering the table changes the output for inputs with ambiguous marker
//! runs.

/// One paired-marker substitution rule.
struct Rule {
    marker: &'static str,
    open: &'static str,
    close: &'static str,
}

/// Ordered substitution rules. Triple markers must be consumed before the
/// shorter markers run.
const RULES: [Rule; 3] = [
    Rule {
        marker: "***",
        open: "<br><strong><em>",
        close: "</em></strong><br>",
    },
    Rule {
        marker: "**",
        open: "<strong>",
        close: "</strong>",
    },
    Rule {
        marker: "*",
        open: "<em>",
        close: "</em>",
    },
];

/// Formats reply text as display markup.
///
/// Metacharacters are escaped first, raw newlines become `<br>`, then the
/// marker rules run in table order. Substituted spans are not re-escaped, so
/// malformed marker nesting (e.g. `**a*b**c*`) can produce malformed markup;
/// callers get exactly what the rules say, nothing smarter.
pub fn format(text: &str) -> String {
    let mut out = escape(text);
    for rule in &RULES {
        out = apply_rule(&out, rule);
    }
    out
}

/// Escapes `&`, `<`, and `>`, and turns raw newlines into `<br>`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

/// Replaces each shortest non-overlapping `marker…marker` pair, scanning
/// left to right. An unpaired marker is left untouched.
fn apply_rule(text: &str, rule: &Rule) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(rule.marker) {
        let after_open = start + rule.marker.len();
        let Some(span) = rest[after_open..].find(rule.marker) else {
            break;
        };
        out.push_str(&rest[..start]);
        out.push_str(rule.open);
        out.push_str(&rest[after_open..after_open + span]);
        out.push_str(rule.close);
        rest = &rest[after_open + span + rule.marker.len()..];
    }
    out.push_str(rest);
    out
}
