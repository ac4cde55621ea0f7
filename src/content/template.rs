/// Values a template may reference as `{key}`.
pub trait Placeholders {
    fn lookup(&self, key: &str) -> Option<&str>;
}

/// Render `template`, replacing every known `{key}`. Unknown keys and
/// stray braces are copied through. Substituted values are never
/// re-scanned.
pub fn fill(template: &str, values: &impl Placeholders) -> String {
    fill_marked(template, "{", values)
}

/// Like [`fill`], but placeholders start with `open` (e.g. `{@`) so the
/// template can carry literal `{...}` expressions.
pub fn fill_marked(template: &str, open: &str, values: &impl Placeholders) -> String {
    let mut out = String::with_capacity(template.len() + 64);
    let mut rest = template;

    while let Some(start) = rest.find(open) {
        out.push_str(&rest[..start]);
        let after = &rest[start + open.len()..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match values.lookup(key) {
                    Some(v) => out.push_str(v),
                    None => {
                        out.push_str(open);
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Use `primary` when it exists and fits in `max` chars, otherwise the
/// fallback. A fallback that is itself too long is cut at `max` chars.
pub fn bounded(primary: Option<String>, max: usize, fallback: impl FnOnce() -> String) -> String {
    match primary {
        Some(p) if char_len(&p) <= max => p,
        _ => truncate_chars(fallback(), max),
    }
}

fn truncate_chars(s: String, max: usize) -> String {
    if char_len(&s) <= max {
        return s;
    }
    s.chars().take(max).collect::<String>().trim_end().to_string()
}

/// Collapse whitespace runs and trim.
pub fn squash(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Upper-case the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Map(HashMap<&'static str, &'static str>);

    impl Placeholders for Map {
        fn lookup(&self, key: &str) -> Option<&str> {
            self.0.get(key).copied()
        }
    }

    fn map(pairs: &[(&'static str, &'static str)]) -> Map {
        Map(pairs.iter().copied().collect())
    }

    #[test]
    fn fills_known_keys() {
        let m = map(&[("name", "Acme"), ("category", "Writing")]);
        assert_eq!(fill("{name} is a {category} tool", &m), "Acme is a Writing tool");
    }

    #[test]
    fn unknown_and_unclosed_braces_pass_through() {
        let m = map(&[("name", "Acme")]);
        assert_eq!(fill("{name} {other} {open", &m), "Acme {other} {open");
        assert_eq!(fill("no braces", &m), "no braces");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let m = map(&[("name", "{category}"), ("category", "Writing")]);
        assert_eq!(fill("{name}", &m), "{category}");
    }

    #[test]
    fn marked_placeholders_leave_plain_braces_alone() {
        let m = map(&[("name", "Acme")]);
        assert_eq!(
            fill_marked("{items.map(i => <b>{@name}</b>)} {@nope}", "{@", &m),
            "{items.map(i => <b>Acme</b>)} {@nope}"
        );
    }

    #[test]
    fn bounded_prefers_primary_that_fits() {
        assert_eq!(bounded(Some("short".into()), 10, || "fallback".into()), "short");
        assert_eq!(bounded(Some("far too long".into()), 5, || "fb".into()), "fb");
        assert_eq!(bounded(None, 10, || "fb".into()), "fb");
    }

    #[test]
    fn bounded_cuts_oversized_fallback_on_char_boundary() {
        let out = bounded(None, 4, || "ééééé".into());
        assert_eq!(out, "éééé");
        assert_eq!(char_len(&out), 4);
    }

    #[test]
    fn helpers() {
        assert_eq!(squash("  a   b \n c "), "a b c");
        assert_eq!(capitalize("acme review"), "Acme review");
        assert_eq!(capitalize(""), "");
    }
}
