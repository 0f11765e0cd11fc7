use shared::dto::HourTypeDto;
use shared::hours::HourCategory;

use super::Notice;
use crate::layout::escape;

/// State behind the log-hours page: the dropdown options exactly as
/// the API returned them, the selected category, and any notice left
/// by a previous submission.
pub struct EntryFormState {
    hour_types: Vec<HourTypeDto>,
    selected: Option<HourCategory>,
    notice: Option<Notice>,
}

impl EntryFormState {
    pub const fn new(hour_types: Vec<HourTypeDto>) -> Self {
        Self {
            hour_types,
            selected: None,
            notice: None,
        }
    }

    /// Selects by exact display name. Anything else deselects, which
    /// hides every conditional field.
    pub fn select(&mut self, name: &str) {
        self.selected = HourCategory::from_display_name(name);
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn shows_time_range(&self) -> bool {
        matches!(
            self.selected,
            Some(HourCategory::StandBy | HourCategory::CollateralDuty)
        )
    }

    pub fn shows_description(&self) -> bool {
        self.selected == Some(HourCategory::CollateralDuty)
    }

    pub fn shows_date(&self) -> bool {
        self.selected == Some(HourCategory::SleepIn)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(notice) = &self.notice {
            out.push_str(&notice.render());
            out.push('\n');
        }

        // Category picker is a GET form, so applying a selection
        // re-renders the page with the fields that category needs.
        out.push_str(
            "<form id=\"category-form\" method=\"get\" action=\"/log-hours\">\n\
             <label for=\"hour-type\">Hour type</label>\n\
             <select id=\"hour-type\" name=\"type\">\n\
             <option value=\"\">Select an hour type</option>\n",
        );
        for hour_type in &self.hour_types {
            let name = escape(&hour_type.name);
            let marker = if self.selected.map(HourCategory::display_name)
                == Some(hour_type.name.as_str())
            {
                " selected"
            } else {
                ""
            };
            out.push_str(&format!(
                "<option value=\"{name}\"{marker}>{name}</option>\n"
            ));
        }
        out.push_str("</select>\n<button type=\"submit\">Apply</button>\n</form>\n");

        if let Some(category) = self.selected {
            out.push_str(&format!(
                "<form id=\"entry-form\" method=\"post\" action=\"/log-hours\">\n\
                 <input type=\"hidden\" name=\"type\" value=\"{}\">\n\
                 <label for=\"badge-num\">Badge number</label>\n\
                 <input id=\"badge-num\" name=\"badge_num\" type=\"number\" required>\n",
                category.display_name()
            ));
            if self.shows_time_range() {
                out.push_str(
                    "<label for=\"start-date-time\">Start</label>\n\
                     <input id=\"start-date-time\" name=\"startDateTime\" type=\"datetime-local\" required>\n\
                     <label for=\"end-date-time\">End</label>\n\
                     <input id=\"end-date-time\" name=\"endDateTime\" type=\"datetime-local\" required>\n",
                );
            }
            if self.shows_description() {
                out.push_str(
                    "<label for=\"description\">Description</label>\n\
                     <input id=\"description\" name=\"description\" type=\"text\" required>\n",
                );
            }
            if self.shows_date() {
                out.push_str(
                    "<label for=\"date\">Date</label>\n\
                     <input id=\"date\" name=\"date\" type=\"date\" required>\n",
                );
            }
            out.push_str("<button type=\"submit\">Log hours</button>\n</form>\n");
        }
        out
    }
}
