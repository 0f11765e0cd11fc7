pub mod entry_form;
pub mod hours_table;
pub mod member_search;
pub mod navbar;

use crate::layout::escape;

/// One-line page notice rendered above a component region.
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn render(&self) -> String {
        match self {
            Self::Success(text) => {
                format!("<p class=\"notice success\">{}</p>", escape(text))
            }
            Self::Error(text) => format!("<p class=\"notice error\">{}</p>", escape(text)),
        }
    }
}
