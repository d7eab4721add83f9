//! Display text for the two supported languages, and the page theme.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ne,
    En,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// Every piece of chrome text the dashboard shows.
#[derive(Debug, Serialize)]
pub struct Strings {
    pub page_title: &'static str,
    pub sidebar_title: &'static str,
    pub refresh: &'static str,
    pub error_connection: &'static str,
    pub loaded: &'static str,
    pub loaded_at: &'static str,
    pub select_placeholder: &'static str,
    pub total_results: &'static str,
    pub missing_columns: &'static str,
    pub available_columns: &'static str,
    pub language: &'static str,
    pub theme: &'static str,
    pub light: &'static str,
    pub dark: &'static str,
    pub export_csv: &'static str,
    pub plot: &'static str,
    pub village_unit: &'static str,
    pub ward: &'static str,
}

static NE: Strings = Strings {
    page_title: "भू-उपयोग क्षेत्र वर्गीकरण खोज प्रणाली",
    sidebar_title: "फिल्टरहरू र नियन्त्रणहरू (Filters & Controls)",
    refresh: "डाटा रिफ्रेस गर्नुहोस् (Refresh Data)",
    error_connection: "तथ्याङ्क लोड गर्न सकिएन। कृपया इन्टरनेट जडान जाँच गर्नुहोस् वा पुनः प्रयास गर्नुहोस्।",
    loaded: "तथ्याङ्क सफलतापूर्वक लोड भयो!",
    loaded_at: "लोड गरिएको समय",
    select_placeholder: "छान्नुहोस् (Select)",
    total_results: "जम्मा नतिजा (Total Results)",
    missing_columns: "केही स्तम्भहरू फेला परेनन् (Some columns missing)",
    available_columns: "उपलब्ध स्तम्भहरू (Available Columns)",
    language: "भाषा",
    theme: "थिम",
    light: "उज्यालो",
    dark: "अँध्यारो",
    export_csv: "CSV डाउनलोड",
    plot: "कित्ता नं.",
    village_unit: "साविक गा.",
    ward: "वडा नं.",
};

static EN: Strings = Strings {
    page_title: "Land-Use Zone Classification Search",
    sidebar_title: "Filters & Controls",
    refresh: "Refresh Data",
    error_connection: "Could not load data. Please check your internet connection or try again.",
    loaded: "Data loaded successfully!",
    loaded_at: "Loaded at",
    select_placeholder: "Select",
    total_results: "Total Results",
    missing_columns: "Some columns missing",
    available_columns: "Available Columns",
    language: "Language",
    theme: "Theme",
    light: "Light",
    dark: "Dark",
    export_csv: "Download CSV",
    plot: "Plot No.",
    village_unit: "Former VDC",
    ward: "Ward No.",
};

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Ne => &NE,
            Locale::En => &EN,
        }
    }

    /// Label for a filter control over `column`. Nepali shows the column
    /// header as is; English glosses it.
    pub fn control_label(self, gloss: &str, column: &str) -> String {
        match self {
            Locale::Ne => column.to_string(),
            Locale::En => format!("{} ({})", gloss, column),
        }
    }
}
