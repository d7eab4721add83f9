use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    cascade::{self, Selections},
    columns::{ColumnLabels, Diagnostics},
    error::DataUnavailable,
    fetch::Dataset,
    i18n::{Locale, Strings, Theme},
    session::Session,
};

/// One dropdown in the sidebar. `key` is the query parameter it drives.
#[derive(Debug, Clone, Serialize)]
pub struct FilterControl {
    pub key: &'static str,
    pub column: String,
    pub label: String,
    pub placeholder: &'static str,
    pub options: Vec<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewError {
    pub kind: &'static str,
    pub message: String,
}

/// Everything the page needs to draw one interaction's result.
#[derive(Debug, Serialize)]
pub struct View {
    pub locale: Locale,
    pub theme: Theme,
    pub text: &'static Strings,
    pub controls: Vec<FilterControl>,
    pub applied: Selections,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    pub row_count: usize,
    pub count_header: Option<String>,
    pub diagnostics: Option<Diagnostics>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub error: Option<ViewError>,
}

impl View {
    fn empty(session: &Session) -> Self {
        Self {
            locale: session.locale,
            theme: session.theme,
            text: session.locale.strings(),
            controls: Vec::new(),
            applied: Selections::default(),
            columns: Vec::new(),
            rows: Vec::new(),
            row_count: 0,
            count_header: None,
            diagnostics: None,
            loaded_at: None,
            error: None,
        }
    }
}

/// Run the filter cascade for `session` and lay out the result.
/// Reads `dataset`, never changes it.
pub fn render(dataset: &Dataset, session: &Session, labels: &ColumnLabels) -> Result<View> {
    let result = cascade::run(&dataset.table, labels, &session.filters)?;
    let text = session.locale.strings();

    let candidates = [
        ("plot", text.plot, &labels.plot, result.options.plot.as_ref(), &result.applied.plot),
        (
            "vdc",
            text.village_unit,
            &labels.village_unit,
            result.options.village_unit.as_ref(),
            &result.applied.village_unit,
        ),
        ("ward", text.ward, &labels.ward, result.options.ward.as_ref(), &result.applied.ward),
    ];
    let controls = candidates
        .into_iter()
        .filter_map(|(key, gloss, column, options, selected)| {
            Some(FilterControl {
                key,
                column: column.clone(),
                label: session.locale.control_label(gloss, column),
                placeholder: text.select_placeholder,
                options: options?.clone(),
                selected: selected.clone(),
            })
        })
        .collect();

    let row_count = result.row_count();
    Ok(View {
        controls,
        applied: result.applied.clone(),
        columns: result.table.column_names(),
        rows: result.table.rows(),
        row_count,
        count_header: Some(format!("{}: {}", text.total_results, row_count)),
        diagnostics: Diagnostics::inspect(&dataset.table, labels),
        loaded_at: Some(dataset.fetched_at),
        ..View::empty(session)
    })
}

/// The view shown when the source could not be loaded: message, no table.
pub fn render_error(err: &DataUnavailable, session: &Session) -> View {
    let text = session.locale.strings();
    View {
        error: Some(ViewError {
            kind: err.kind(),
            message: format!("{}: {}", text.error_connection, err),
        }),
        ..View::empty(session)
    }
}

/// The view shown when the loaded data could not be laid out.
pub fn render_failure(err: &anyhow::Error, session: &Session) -> View {
    View {
        error: Some(ViewError {
            kind: "internal",
            message: format!("{:#}", err),
        }),
        ..View::empty(session)
    }
}
