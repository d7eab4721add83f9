use serde::{Deserialize, Serialize};

use crate::{
    cascade::Selections,
    i18n::{Locale, Theme},
};

/// Session state as it arrives in a request's query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionQuery {
    pub plot: Option<String>,
    pub vdc: Option<String>,
    pub ward: Option<String>,
    pub lang: Option<Locale>,
    pub theme: Option<Theme>,
}

/// Everything one user interaction carries: filter selections and chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub filters: Selections,
    pub locale: Locale,
    pub theme: Theme,
}

impl Session {
    pub fn from_query(query: SessionQuery, default_locale: Locale, default_theme: Theme) -> Self {
        Self {
            filters: Selections {
                plot: non_empty(query.plot),
                village_unit: non_empty(query.vdc),
                ward: non_empty(query.ward),
            },
            locale: query.lang.unwrap_or(default_locale),
            theme: query.theme.unwrap_or(default_theme),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
