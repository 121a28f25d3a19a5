//! Applying `--field` and `--file` arguments to a loaded form.

use std::fs;
use std::path::Path;

use tableview_lib::error::Error;
use tableview_lib::form::FieldKind;
use tableview_lib::form::FileUpload;
use tableview_lib::form::Form;

use crate::args::KeyValue;
use crate::error::CliError;

/// Reads every `--file` argument into an upload.
pub fn read_files(files: &[KeyValue]) -> Result<Vec<(String, FileUpload)>, CliError> {
    files
        .iter()
        .map(|file| {
            let path = Path::new(&file.value);
            let bytes = fs::read(path).map_err(|source| CliError::io(path, source))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.value.clone());
            Ok((file.name.clone(), FileUpload::new(file_name, bytes)))
        })
        .collect()
}

/// Types `fields` into `form` and attaches `uploads`.
///
/// Checkboxes take `on`, `true`, `yes` or `1` as ticked; anything else
/// clears them.
pub fn fill_form(
    form: &mut Form,
    fields: &[KeyValue],
    uploads: Vec<(String, FileUpload)>,
) -> Result<(), Error> {
    for field in fields {
        let is_checkbox = matches!(
            form.field(&field.name).map(|f| &f.kind),
            Some(FieldKind::Checkbox { .. })
        );
        if is_checkbox {
            form.set_checked(&field.name, is_ticked(&field.value))?;
        } else {
            form.set_value(&field.name, field.value.clone())?;
        }
    }

    for (name, upload) in uploads {
        form.attach_file(&name, upload)?;
    }

    Ok(())
}

fn is_ticked(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "on" | "true" | "yes" | "1"
    )
}
