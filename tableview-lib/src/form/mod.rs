//! Form document model.
//!
//! A [`Form`] is built from a server-rendered fragment and stands in for the
//! form's part of the document: field values the user edits, files chosen
//! for upload, and the error decorations the submission engine renders.
//!
//! # Example
//!
//! ```
//! use tableview_lib::form::Form;
//!
//! let mut form = Form::from_fragment(
//!     r#"<form><input name="name" value=""><input name="email"></form>"#,
//! );
//! form.set_value("name", "Ada").unwrap();
//!
//! form.show_field_errors("email", vec!["Required field missing".to_string()]);
//! assert!(form.field("email").unwrap().has_error());
//!
//! form.clear_errors();
//! assert!(!form.has_decorations());
//! ```

mod field;
mod fragment;
mod payload;
pub mod submit;

pub use field::*;
pub use payload::*;
pub use submit::BoundForm;
pub use submit::OnSuccess;
pub use submit::SubmitOutcome;

use crate::error::Error;

/// In-memory form document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    markup: String,
    fields: Vec<FormField>,
    global_errors: Vec<String>,
}

impl Form {
    /// Builds a form from server-rendered markup.
    pub fn from_fragment(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let fields = fragment::parse_fields(&markup);
        Self {
            markup,
            fields,
            global_errors: Vec::new(),
        }
    }

    /// Replaces the whole form, values and decorations included.
    pub fn replace_content(&mut self, markup: impl Into<String>) {
        *self = Self::from_fragment(markup);
    }

    /// Returns the markup the form was last built from.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Returns all fields in document order.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Returns the first field called `name`.
    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    fn fields_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut FormField> + 'a {
        self.fields.iter_mut().filter(move |field| field.name == name)
    }

    /// Sets the value of a field the way a user would.
    ///
    /// Text inputs and textareas take the value as is. Selects select the
    /// option with that value (for multiple selects, a space separated list).
    /// Radio groups check the radio with that value. Checkboxes and file
    /// inputs are set with [`set_checked`](Self::set_checked) and
    /// [`attach_file`](Self::attach_file).
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), Error> {
        let value = value.into();

        let kind = &self.field(name).ok_or_else(|| Error::unknown_field(name))?.kind;
        let is_radio = matches!(kind, FieldKind::Radio { .. });
        let is_select = matches!(kind, FieldKind::Select { .. });
        let is_text = matches!(kind, FieldKind::Input { .. } | FieldKind::TextArea);

        if is_radio {
            self.check_radio(name, &value)
        } else if is_select {
            self.select_options(name, &value)
        } else if is_text {
            for field in self.fields_named_mut(name) {
                field.value.clone_from(&value);
            }
            Ok(())
        } else {
            Err(Error::invalid_field(name, "a text value"))
        }
    }

    fn check_radio(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let offered = self
            .fields
            .iter()
            .any(|field| field.name == name && field.value == value);
        if !offered {
            return Err(Error::invalid_field(name, "a value outside the radio group"));
        }

        for field in self.fields_named_mut(name) {
            if let FieldKind::Radio { checked } = &mut field.kind {
                *checked = field.value == value;
            }
        }
        Ok(())
    }

    fn select_options(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let Some(FormField {
            kind: FieldKind::Select { options, multiple },
            ..
        }) = self.fields.iter_mut().find(|field| field.name == name)
        else {
            return Err(Error::unknown_field(name));
        };

        let wanted: Vec<&str> = if *multiple {
            value.split_whitespace().collect()
        } else {
            vec![value]
        };

        if wanted
            .iter()
            .any(|want| !options.iter().any(|option| option.value == *want))
        {
            return Err(Error::invalid_field(name, "a value outside the option list"));
        }

        for option in options.iter_mut() {
            option.selected = wanted.contains(&option.value.as_str());
        }
        Ok(())
    }

    /// Ticks or clears a checkbox.
    pub fn set_checked(&mut self, name: &str, checked: bool) -> Result<(), Error> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::unknown_field(name))?;

        match &mut field.kind {
            FieldKind::Checkbox { checked: state } => {
                *state = checked;
                Ok(())
            }
            _ => Err(Error::invalid_field(name, "a checked state")),
        }
    }

    /// Attaches a file to a file input.
    pub fn attach_file(&mut self, name: &str, upload: FileUpload) -> Result<(), Error> {
        let field = self
            .fields
            .iter_mut()
            .find(|field| field.name == name)
            .ok_or_else(|| Error::unknown_field(name))?;

        match &mut field.kind {
            FieldKind::File { upload: slot } => {
                *slot = Some(upload);
                Ok(())
            }
            _ => Err(Error::invalid_field(name, "a file")),
        }
    }

    /// Serializes every enabled field, files included, in document order.
    pub fn payload(&self) -> FormPayload {
        let mut payload = FormPayload::new();

        for field in self.fields.iter().filter(|field| !field.disabled) {
            if let FieldKind::File {
                upload: Some(upload),
            } = &field.kind
            {
                payload.push_file(field.name.clone(), upload.clone());
            }
            for value in field.submitted_text() {
                payload.push_text(field.name.clone(), value);
            }
        }

        payload
    }

    // =========================================================================
    // Error decorations
    // =========================================================================

    /// Removes the global banner and every field's error block and marker.
    pub fn clear_errors(&mut self) {
        self.global_errors.clear();
        for field in &mut self.fields {
            field.errors.clear();
        }
    }

    /// Shows `messages` in the global banner. An empty list shows nothing.
    pub fn show_global_errors(&mut self, messages: Vec<String>) {
        self.global_errors = messages;
    }

    /// Closes the global banner, as its dismiss control does.
    pub fn dismiss_global_errors(&mut self) {
        self.global_errors.clear();
    }

    /// Returns the global banner messages, if the banner is shown.
    pub fn global_errors(&self) -> Option<&[String]> {
        (!self.global_errors.is_empty()).then_some(self.global_errors.as_slice())
    }

    /// Attaches an error block to the field called `name`.
    ///
    /// Radio groups carry the block on their first radio. Returns `false`
    /// if the form has no such field or `messages` is empty.
    pub fn show_field_errors(&mut self, name: &str, messages: Vec<String>) -> bool {
        if messages.is_empty() {
            return false;
        }
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => {
                field.errors = messages;
                true
            }
            None => false,
        }
    }

    /// Returns the messages shown on the field called `name`.
    pub fn field_errors(&self, name: &str) -> &[String] {
        self.field(name).map(FormField::errors).unwrap_or_default()
    }

    /// Returns `true` if any banner or field error block is shown.
    pub fn has_decorations(&self) -> bool {
        !self.global_errors.is_empty() || self.fields.iter().any(FormField::has_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FORM: &str = r#"
        <input type="text" name="name" value="Ada">
        <input type="email" name="email">
        <select name="tags" multiple>
          <option value="a">A</option><option value="b">B</option><option value="c">C</option>
        </select>
        <input type="radio" name="plan" value="free" checked>
        <input type="radio" name="plan" value="pro">
        <input type="checkbox" name="active">
        <input type="file" name="avatar">
        <input type="text" name="legacy" value="old" disabled>
    "#;

    #[test]
    fn test_set_values() {
        let mut form = Form::from_fragment(FORM);
        form.set_value("email", "ada@example.com").unwrap();
        form.set_value("tags", "a c").unwrap();
        form.set_value("plan", "pro").unwrap();
        form.set_checked("active", true).unwrap();

        let payload = form.payload();
        assert_eq!(payload.text("email"), Some("ada@example.com"));
        assert_eq!(payload.text("plan"), Some("pro"));
        assert_eq!(payload.text("active"), Some("on"));

        let tags: Vec<_> = payload
            .parts()
            .iter()
            .filter(|part| part.name == "tags")
            .collect();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_set_value_rejections() {
        let mut form = Form::from_fragment(FORM);
        assert!(matches!(
            form.set_value("missing", "x"),
            Err(Error::UnknownField { .. })
        ));
        assert!(matches!(
            form.set_value("tags", "z"),
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            form.set_value("plan", "enterprise"),
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            form.set_value("avatar", "x"),
            Err(Error::InvalidField { .. })
        ));
        assert!(matches!(
            form.attach_file("name", FileUpload::new("a.txt", vec![])),
            Err(Error::InvalidField { .. })
        ));
    }

    #[test]
    fn test_payload_includes_files_and_skips_disabled() {
        let mut form = Form::from_fragment(FORM);
        form.attach_file("avatar", FileUpload::new("me.png", vec![0x89, 0x50]))
            .unwrap();

        let payload = form.payload();
        assert_eq!(payload.file("avatar").map(|f| f.file_name.as_str()), Some("me.png"));
        assert_eq!(payload.text("legacy"), None);
        assert_eq!(payload.text("active"), None);
        assert_eq!(payload.text("name"), Some("Ada"));
    }

    #[test]
    fn test_decorations() {
        let mut form = Form::from_fragment(FORM);
        assert!(!form.has_decorations());

        form.show_global_errors(vec!["Locked".to_string()]);
        assert!(form.show_field_errors("email", vec!["Invalid".to_string()]));
        assert!(!form.show_field_errors("email", Vec::new()));
        assert!(!form.show_field_errors("nope", vec!["x".to_string()]));

        assert_eq!(form.global_errors(), Some(&["Locked".to_string()][..]));
        assert_eq!(form.field_errors("email"), ["Invalid".to_string()]);
        assert!(form.field("email").unwrap().has_error());

        form.dismiss_global_errors();
        assert!(form.global_errors().is_none());
        assert!(form.has_decorations());

        form.clear_errors();
        assert!(!form.has_decorations());
    }

    #[test]
    fn test_replace_content_drops_state() {
        let mut form = Form::from_fragment(FORM);
        form.set_value("email", "x@y").unwrap();
        form.show_global_errors(vec!["err".to_string()]);

        form.replace_content(r#"<input name="code">"#);

        assert_eq!(form.fields().len(), 1);
        assert!(form.field("email").is_none());
        assert!(!form.has_decorations());
        assert_eq!(form.markup(), r#"<input name="code">"#);
    }
}
