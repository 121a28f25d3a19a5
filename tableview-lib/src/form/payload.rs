//! Multipart payload assembled from a form.

use super::field::FileUpload;

/// Value of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    /// A plain text part.
    Text(String),
    /// A binary file part.
    File(FileUpload),
}

/// A named multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPart {
    /// Part name.
    pub name: String,
    /// Part value.
    pub value: PartValue,
}

/// Ordered multipart payload. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text part.
    pub fn push_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::Text(value.into()),
        });
    }

    /// Appends a file part.
    pub fn push_file(&mut self, name: impl Into<String>, upload: FileUpload) {
        self.parts.push(FormPart {
            name: name.into(),
            value: PartValue::File(upload),
        });
    }

    /// Replaces every part called `name` with a single text part.
    pub fn set_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.parts.retain(|part| part.name != name);
        self.push_text(name, value);
    }

    /// Merges caller-supplied fields; each one overrides same-named parts.
    pub fn merge<K, V>(&mut self, extra: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in extra {
            self.set_text(name, value);
        }
    }

    /// Returns the first text value for `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(text) if part.name == name => Some(text.as_str()),
            _ => None,
        })
    }

    /// Returns the first file for `name`.
    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::File(upload) if part.name == name => Some(upload),
            _ => None,
        })
    }

    /// Returns the parts in order.
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Returns the number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Returns `true` if the payload has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl IntoIterator for FormPayload {
    type Item = FormPart;
    type IntoIter = std::vec::IntoIter<FormPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_existing_parts() {
        let mut payload = FormPayload::new();
        payload.push_text("name", "Ada");
        payload.push_text("id", "stale");
        payload.push_text("id", "stale-again");

        payload.merge([("id", "42")]);

        assert_eq!(payload.len(), 2);
        assert_eq!(payload.text("id"), Some("42"));
        assert_eq!(payload.text("name"), Some("Ada"));
    }

    #[test]
    fn test_file_lookup() {
        let mut payload = FormPayload::new();
        payload.push_file("avatar", FileUpload::new("a.png", vec![1, 2, 3]));

        assert_eq!(payload.file("avatar").map(FileUpload::len), Some(3));
        assert_eq!(payload.text("avatar"), None);
    }
}
