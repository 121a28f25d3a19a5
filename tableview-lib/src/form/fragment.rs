//! Extraction of form controls from server-rendered markup.
//!
//! Only what form submission needs is read: named `input`, `textarea` and
//! `select` controls, their values and `label for=` texts. Everything else in
//! the fragment is kept verbatim as markup for the presenter.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::field::FieldKind;
use super::field::FormField;
use super::field::SelectOption;

static CONTROL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<input\b(?P<input>[^>]*)>|<textarea\b(?P<textarea>[^>]*)>(?P<text>.*?)</textarea\s*>|<select\b(?P<select>[^>]*)>(?P<options>.*?)</select\s*>",
    )
    .expect("control pattern is valid")
});

static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("attribute pattern is valid")
});

static OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<option\b([^>]*)>([^<]*)").expect("option pattern is valid")
});

static LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<label\b([^>]*)>(.*?)</label\s*>").expect("label pattern is valid")
});

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#[xX]([0-9a-fA-F]{1,6})|([a-zA-Z]+));")
        .expect("entity pattern is valid")
});

/// Attributes of one tag, names lowercased. Boolean attributes map to `None`.
struct Attributes(HashMap<String, Option<String>>);

impl Attributes {
    fn parse(source: &str) -> Self {
        let map = ATTRIBUTE
            .captures_iter(source)
            .map(|caps| {
                let name = caps[1].to_ascii_lowercase();
                let value = caps
                    .get(2)
                    .or_else(|| caps.get(3))
                    .or_else(|| caps.get(4))
                    .map(|m| decode_entities(m.as_str()));
                (name, value)
            })
            .collect();
        Self(map)
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(|value| value.as_deref())
    }

    fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }
}

/// Reads every submittable control out of `markup`, in document order.
pub(crate) fn parse_fields(markup: &str) -> Vec<FormField> {
    let labels = parse_labels(markup);

    let mut fields: Vec<FormField> = CONTROL
        .captures_iter(markup)
        .filter_map(|caps| {
            if let Some(attrs) = caps.name("input") {
                parse_input(&Attributes::parse(attrs.as_str()))
            } else if let Some(attrs) = caps.name("textarea") {
                let text = caps.name("text").map_or("", |m| m.as_str());
                parse_textarea(&Attributes::parse(attrs.as_str()), text)
            } else if let Some(attrs) = caps.name("select") {
                let options = caps.name("options").map_or("", |m| m.as_str());
                parse_select(&Attributes::parse(attrs.as_str()), options)
            } else {
                None
            }
        })
        .collect();

    for field in &mut fields {
        if let Some(id) = &field.id {
            field.label = labels.get(id).cloned();
        }
    }

    fields
}

fn named_field(attrs: &Attributes, kind: FieldKind) -> Option<FormField> {
    let name = attrs.get("name").filter(|name| !name.is_empty())?;
    let mut field = FormField::new(name, kind);
    field.id = attrs.get("id").map(str::to_string);
    field.disabled = attrs.has("disabled");
    Some(field)
}

fn parse_input(attrs: &Attributes) -> Option<FormField> {
    let input_type = attrs.get("type").unwrap_or("text").to_ascii_lowercase();
    let checked = attrs.has("checked");

    let kind = match input_type.as_str() {
        "submit" | "button" | "reset" | "image" => return None,
        "checkbox" => FieldKind::Checkbox { checked },
        "radio" => FieldKind::Radio { checked },
        "file" => FieldKind::File { upload: None },
        _ => FieldKind::Input { input_type },
    };

    let default_value = match kind {
        FieldKind::Checkbox { .. } | FieldKind::Radio { .. } => "on",
        _ => "",
    };

    let mut field = named_field(attrs, kind)?;
    field.value = attrs.get("value").unwrap_or(default_value).to_string();
    Some(field)
}

fn parse_textarea(attrs: &Attributes, text: &str) -> Option<FormField> {
    let mut field = named_field(attrs, FieldKind::TextArea)?;
    // A newline right after the opening tag is not part of the value.
    let text = text
        .strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text);
    field.value = decode_entities(text);
    Some(field)
}

fn parse_select(attrs: &Attributes, body: &str) -> Option<FormField> {
    let multiple = attrs.has("multiple");

    let mut options: Vec<SelectOption> = OPTION
        .captures_iter(body)
        .map(|caps| {
            let option_attrs = Attributes::parse(&caps[1]);
            let label = decode_entities(caps[2].trim());
            SelectOption {
                value: option_attrs
                    .get("value")
                    .map(str::to_string)
                    .unwrap_or_else(|| label.clone()),
                label,
                selected: option_attrs.has("selected"),
            }
        })
        .collect();

    if !multiple {
        // A single select always submits exactly one option: the last one
        // marked selected, or the first one.
        let chosen = options
            .iter()
            .rposition(|option| option.selected)
            .or_else(|| (!options.is_empty()).then_some(0));
        for (index, option) in options.iter_mut().enumerate() {
            option.selected = Some(index) == chosen;
        }
    }

    named_field(attrs, FieldKind::Select { options, multiple })
}

fn parse_labels(markup: &str) -> HashMap<String, String> {
    LABEL
        .captures_iter(markup)
        .filter_map(|caps| {
            let target = Attributes::parse(&caps[1]).get("for")?.to_string();
            let text = decode_entities(TAG.replace_all(&caps[2], "").trim());
            Some((target, text))
        })
        .collect()
}

/// Decodes character references in attribute values and text of
/// server-rendered forms.
///
/// Numeric references (`&#233;`, `&#x2F;`) decode to their code point.
/// Unknown names and invalid code points are kept as written.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let decoded = if let Some(dec) = caps.get(1) {
                dec.as_str().parse().ok().and_then(char::from_u32)
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16)
                    .ok()
                    .and_then(char::from_u32)
            } else {
                named_entity(&caps[3])
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn named_entity(name: &str) -> Option<char> {
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "hellip" => '\u{2026}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "euro" => '\u{20ac}',
        _ => return None,
    };
    Some(c)
}
