//! Plain-text rendering of the grid and its modal forms.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Mutex;

use log::debug;
use tableview_lib::form::FieldKind;
use tableview_lib::form::Form;
use tableview_lib::form::FormField;
use tableview_lib::grid::Cell;
use tableview_lib::grid::Column;
use tableview_lib::grid::GridView;
use tableview_lib::grid::GridViewModel;
use tableview_lib::modal::ModalPresenter;
use tableview_lib::modal::ShellId;

// =============================================================================
// Table
// =============================================================================

/// Prints each rendered page to stdout.
pub struct TextView {
    columns: Vec<Column>,
}

impl TextView {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

impl GridView for TextView {
    fn columns(&self) -> Vec<Column> {
        self.columns.clone()
    }

    fn render(&self, model: &GridViewModel) {
        print!("{}", format_grid(&self.columns, model));
    }
}

/// Lays out rows as an aligned table followed by the pager and page sizes.
pub fn format_grid(columns: &[Column], model: &GridViewModel) -> String {
    let header: Vec<&str> = columns.iter().map(|column| column.header.as_str()).collect();
    let rows: Vec<Vec<String>> = model
        .rows
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| match cell {
                    Cell::Text(text) => text.clone(),
                    Cell::Actions(id) => id.to_string(),
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..columns.len())
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|text| text.chars().count())
                .chain(std::iter::once(header[i].chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    push_line(&mut out, header.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    if rows.is_empty() {
        out.push_str("(no rows)\n");
    }

    out.push('\n');
    if model.pager.is_paginated() {
        let controls: Vec<String> = model
            .pager
            .controls()
            .filter(|link| link.active || !link.disabled)
            .map(|link| {
                if link.active {
                    format!("[{}]", link.text)
                } else {
                    link.text.clone()
                }
            })
            .collect();
        let _ = writeln!(out, "{}", controls.join(" "));
    }
    let _ = write!(out, "Page {} of {}", model.pager.page, model.pager.total_pages);
    if let Some(total) = model.total_rows {
        let _ = write!(out, ", {} rows", total);
    }
    out.push('\n');

    let sizes: Vec<String> = model
        .page_sizes
        .iter()
        .map(|option| {
            if option.active {
                format!("[{}]", option.size)
            } else {
                option.size.to_string()
            }
        })
        .collect();
    if !sizes.is_empty() {
        let _ = writeln!(out, "Rows per page: {}", sizes.join(" "));
    }

    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// =============================================================================
// Modals
// =============================================================================

/// Prints modal bodies to stdout.
#[derive(Default)]
pub struct TextPresenter {
    titles: Mutex<HashMap<ShellId, String>>,
}

impl TextPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModalPresenter for TextPresenter {
    fn create_shell(&self, id: ShellId, title: &str) {
        self.titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, title.to_string());
    }

    fn set_body(&self, id: ShellId, form: &Form) {
        let title = self
            .titles
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .unwrap_or_else(|| id.to_string());
        print!("{}", format_form(&title, form));
    }

    fn reveal(&self, id: ShellId) {
        debug!("Showing {}", id);
    }

    fn hide(&self, id: ShellId) {
        debug!("Hiding {}", id);
    }
}

/// Lists a form's visible fields with their values and error decorations.
pub fn format_form(title: &str, form: &Form) -> String {
    let mut out = format!("== {} ==\n", title);

    if let Some(messages) = form.global_errors() {
        for message in messages {
            let _ = writeln!(out, "! {}", message);
        }
    }

    for field in form.fields() {
        let Some(value) = display_value(field) else {
            continue;
        };
        let marker = if field.has_error() { "*" } else { " " };
        let _ = writeln!(
            out,
            "{} {} ({}): {}",
            marker,
            field.display_label(),
            field.name,
            value
        );
        for message in field.errors() {
            let _ = writeln!(out, "    ! {}", message);
        }
    }

    out
}

fn display_value(field: &FormField) -> Option<String> {
    let value = match &field.kind {
        FieldKind::Input { input_type } if input_type == "hidden" => return None,
        FieldKind::Input { input_type } if input_type == "password" => "*".repeat(field.value.len()),
        FieldKind::Input { .. } | FieldKind::TextArea => field.value.clone(),
        FieldKind::Select { options, .. } => options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.label.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        FieldKind::Checkbox { checked } => if *checked { "[x]" } else { "[ ]" }.to_string(),
        FieldKind::Radio { checked } => {
            let mark = if *checked { "(*)" } else { "( )" };
            format!("{} {}", mark, field.value)
        }
        FieldKind::File { upload } => upload
            .as_ref()
            .map(|upload| upload.file_name.clone())
            .unwrap_or_else(|| "(no file)".to_string()),
    };
    Some(if field.disabled {
        format!("{} (disabled)", value)
    } else {
        value
    })
}
