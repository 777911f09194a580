//! History text lookup.
//!
//! Strings live under `translations` in the rules document and use
//! `%{name}` placeholders. Lookup failures never abort a run; they render
//! as visible placeholder text instead.

use pizzapets_data::HistoryKind;
use serde_json::Value;

/// Looks up a dotted `key` and fills in `%{name}` placeholders.
///
/// Each placeholder is replaced at its first occurrence only. A missing
/// or empty entry renders `missing translation for <key>!`, and any
/// `{name}` left unfilled renders a message naming it.
#[must_use]
pub fn translate(translations: &Value, key: &str, data: &[(&str, &str)]) -> String {
    let found = key
        .split('.')
        .try_fold(translations, |node, segment| node.get(segment))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty());

    let Some(template) = found else {
        return format!("missing translation for {}!", key);
    };

    let mut text = template.to_string();
    for (name, value) in data {
        text = text.replacen(&format!("%{{{}}}", name), value, 1);
    }

    match unfilled_placeholder(&text) {
        Some(name) => format!("translation interpolation value for \"{}\" is missing!", name),
        None => text,
    }
}

/// Description and glyph of a history line of this kind.
#[must_use]
pub fn history_line(translations: &Value, kind: HistoryKind, data: &[(&str, &str)]) -> (String, String) {
    let scope = format!("history.{}", kind.key());
    (
        translate(translations, &format!("{}.description", scope), data),
        translate(translations, &format!("{}.emoji", scope), &[]),
    )
}

fn unfilled_placeholder(text: &str) -> Option<&str> {
    let open = text.find('{')?;
    let rest = &text[open + 1..];
    let close = rest.find('}')?;
    Some(&rest[..close])
}
