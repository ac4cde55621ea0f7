use std::sync::LazyLock;

use regex::Regex;

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());
static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"import.*?;").unwrap());
static CONST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"const.*?=.*?;").unwrap());
static EXPR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{.*?\}").unwrap());

const P_CLASS: &str = "text-gray-300 mb-4";
const H3_CLASS: &str = "text-xl font-semibold text-cyan-400 mb-4 mt-8";
const UL_CLASS: &str = "list-disc list-inside mb-6 space-y-2";
const LI_CLASS: &str = "text-gray-300 mb-2";

/// Escape text placed between JSX tags.
pub fn jsx_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '{' => out.push_str("{'{'}"),
            '}' => out.push_str("{'}'}"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for a double-quoted JSX attribute.
pub fn jsx_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}

/// A JavaScript string literal (JSON string syntax).
pub fn js_string(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

fn inline(s: &str) -> String {
    BOLD_RE
        .replace_all(&jsx_text(s), r#"<strong className="text-white">$1</strong>"#)
        .into_owned()
}

/// Convert the small markdown subset used by section bodies (`###`
/// headings, `-` lists, `**bold**`, blank-line paragraphs) into JSX.
pub fn markdown_to_jsx(md: &str, indent: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut in_list = false;

    for raw in md.lines() {
        let line = raw.trim();
        let item = line.strip_prefix("- ");

        if in_list && item.is_none() {
            lines.push("</ul>".to_string());
            in_list = false;
        }

        if line.is_empty() {
            continue;
        } else if let Some(text) = item {
            if !in_list {
                lines.push(format!(r#"<ul className="{}">"#, UL_CLASS));
                in_list = true;
            }
            lines.push(format!(r#"  <li className="{}">{}</li>"#, LI_CLASS, inline(text)));
        } else if let Some(text) = line.strip_prefix("### ") {
            lines.push(format!(r#"<h3 className="{}">{}</h3>"#, H3_CLASS, inline(text)));
        } else {
            lines.push(format!(r#"<p className="{}">{}</p>"#, P_CLASS, inline(line)));
        }
    }
    if in_list {
        lines.push("</ul>".to_string());
    }

    lines
        .iter()
        .map(|l| format!("{}{}", indent, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rough prose size of generated source: drop tags, imports, const
/// statements and `{...}` expressions, then count whitespace tokens.
pub fn estimate_word_count(source: &str) -> usize {
    let s = TAG_RE.replace_all(source, " ");
    let s = IMPORT_RE.replace_all(&s, "");
    let s = CONST_RE.replace_all(&s, "");
    let s = EXPR_RE.replace_all(&s, "");
    s.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_jsx_specials() {
        assert_eq!(jsx_text("a < b & {c}"), "a &lt; b &amp; {'{'}c{'}'}");
        assert_eq!(jsx_attr(r#"say "hi" & bye"#), "say &quot;hi&quot; &amp; bye");
        assert_eq!(js_string("line \"one\"\n"), r#""line \"one\"\n""#);
    }

    #[test]
    fn converts_markdown_subset() {
        let md = "Intro **bold** text.\n\n### Core\n- **One**: first\n- Two\n\nOutro";
        let out = markdown_to_jsx(md, "");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            [
                r#"<p className="text-gray-300 mb-4">Intro <strong className="text-white">bold</strong> text.</p>"#,
                r#"<h3 className="text-xl font-semibold text-cyan-400 mb-4 mt-8">Core</h3>"#,
                r#"<ul className="list-disc list-inside mb-6 space-y-2">"#,
                r#"  <li className="text-gray-300 mb-2"><strong className="text-white">One</strong>: first</li>"#,
                r#"  <li className="text-gray-300 mb-2">Two</li>"#,
                "</ul>",
                r#"<p className="text-gray-300 mb-4">Outro</p>"#,
            ]
        );
    }

    #[test]
    fn list_at_end_is_closed() {
        let out = markdown_to_jsx("- a\n- b", "    ");
        assert!(out.ends_with("    </ul>"));
        assert!(out.lines().all(|l| l.starts_with("    ")));
    }

    #[test]
    fn word_count_ignores_markup() {
        let src = "import React from 'react';\nconst x = 1;\n<div className=\"a\">Hello brave new world</div>\n{value}";
        assert_eq!(estimate_word_count(src), 4);
        assert_eq!(estimate_word_count(""), 0);
    }
}
