//! User-facing message catalog.

use serde::{Deserialize, Serialize};

/// Language for notifications shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Vi,
}

impl Locale {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Some(Self::En),
            "vi" | "vi-vn" | "vietnamese" => Some(Self::Vi),
            _ => None,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Vi => &VI,
        }
    }
}

/// Fixed notification texts for one locale.
#[derive(Debug)]
pub struct Messages {
    pub default_error: &'static str,
    pub units_load_failed: &'static str,
    pub budgets_load_failed: &'static str,
    pub detail_load_failed: &'static str,
}

static EN: Messages = Messages {
    default_error: "An error occurred. Please try again later.",
    units_load_failed: "Error loading organization list!",
    budgets_load_failed: "Error loading budget information!",
    detail_load_failed: "Error loading unit details!",
};

static VI: Messages = Messages {
    default_error: "Đã có lỗi xảy ra. Vui lòng thử lại sau.",
    units_load_failed: "Lỗi khi tải danh sách đơn vị!",
    budgets_load_failed: "Lỗi khi tải thông tin ngân sách!",
    detail_load_failed: "Lỗi khi tải chi tiết đơn vị!",
};
