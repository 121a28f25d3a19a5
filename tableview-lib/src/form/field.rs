//! Form fields and their values.

/// A file chosen for a file input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name sent in the multipart part.
    pub file_name: String,
    /// MIME type sent in the multipart part.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Creates an upload, guessing the content type from the file extension.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Overrides the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Returns the size of the file in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the file is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "json" => "application/json",
        "csv" => "text/csv",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => "application/octet-stream",
    }
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Submitted value.
    pub value: String,
    /// Visible label.
    pub label: String,
    /// Whether the option is currently selected.
    pub selected: bool,
}

/// The kind of control a field is, with its kind-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A single-line `<input>` (text, email, password, hidden, number, ...).
    Input {
        /// The `type` attribute, lowercased.
        input_type: String,
    },
    /// A `<textarea>`.
    TextArea,
    /// A `<select>`.
    Select {
        /// Available options in document order.
        options: Vec<SelectOption>,
        /// Whether several options can be selected.
        multiple: bool,
    },
    /// An `<input type="checkbox">`.
    Checkbox {
        /// Whether the box is ticked.
        checked: bool,
    },
    /// An `<input type="radio">`. Each radio is its own field sharing a name.
    Radio {
        /// Whether this radio is the chosen one.
        checked: bool,
    },
    /// An `<input type="file">`.
    File {
        /// The attached file, if any.
        upload: Option<FileUpload>,
    },
}

/// A named control of a [`Form`](super::Form) plus its error decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// The `name` attribute.
    pub name: String,
    /// The `id` attribute, if present.
    pub id: Option<String>,
    /// Text of the `<label>` pointing at this field.
    pub label: Option<String>,
    /// Control kind and state.
    pub kind: FieldKind,
    /// Disabled fields are never submitted.
    pub disabled: bool,
    /// Text value; for checkboxes and radios, the value sent when checked.
    pub value: String,
    pub(crate) errors: Vec<String>,
}

impl FormField {
    pub(crate) fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            id: None,
            label: None,
            kind,
            disabled: false,
            value: String::new(),
            errors: Vec::new(),
        }
    }

    /// Returns the error messages currently rendered on this field.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Returns `true` if the field carries the has-error marker.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns the label, falling back to the field name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Returns `true` for file inputs.
    pub fn is_file(&self) -> bool {
        matches!(self.kind, FieldKind::File { .. })
    }

    /// Returns the values this field contributes to a submission.
    ///
    /// Unchecked boxes, unselected options and empty file inputs contribute
    /// nothing, matching what a browser puts into form data.
    pub(crate) fn submitted_text(&self) -> Vec<String> {
        match &self.kind {
            FieldKind::Input { .. } | FieldKind::TextArea => vec![self.value.clone()],
            FieldKind::Select { options, .. } => options
                .iter()
                .filter(|option| option.selected)
                .map(|option| option.value.clone())
                .collect(),
            FieldKind::Checkbox { checked } | FieldKind::Radio { checked } => {
                if *checked {
                    vec![self.value.clone()]
                } else {
                    Vec::new()
                }
            }
            FieldKind::File { .. } => Vec::new(),
        }
    }
}
