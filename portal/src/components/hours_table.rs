use shared::dto::MemberHoursSummaryDto;
use shared::hours::ReportScope;

use super::Notice;
use crate::layout::escape;

/// State behind the LOSAP hours page: the addressed scope plus the
/// rollup rows in the order the API returned them. `None` rows means
/// the fetch failed, and the table region renders a notice instead.
pub struct HoursTableState {
    scope: ReportScope,
    rows: Option<Vec<MemberHoursSummaryDto>>,
}

impl HoursTableState {
    pub const fn new(scope: ReportScope, rows: Option<Vec<MemberHoursSummaryDto>>) -> Self {
        Self { scope, rows }
    }

    pub fn render(&self) -> String {
        let mut out = format!("<h2>{}</h2>\n", self.scope.header_label());

        let (year_value, month_value) = match self.scope {
            ReportScope::AllTime => (String::new(), String::new()),
            ReportScope::Year(year) => (year.to_string(), String::new()),
            ReportScope::Month { year, month } => {
                (year.to_string(), month.number_from_month().to_string())
            }
        };
        out.push_str(&format!(
            "<form id=\"filter-form\" method=\"get\" action=\"/losap-hours\">\n\
             <label for=\"filter-year\">Year</label>\n\
             <input id=\"filter-year\" name=\"year\" type=\"number\" value=\"{year_value}\">\n\
             <label for=\"filter-month\">Month</label>\n\
             <input id=\"filter-month\" name=\"month\" type=\"number\" min=\"1\" max=\"12\" value=\"{month_value}\">\n\
             <button type=\"submit\">Filter</button>\n\
             <a href=\"/losap-hours\">Clear</a>\n\
             </form>\n"
        ));

        match &self.rows {
            None => {
                out.push_str(
                    &Notice::Error("LOSAP hours are currently unavailable.".to_string()).render(),
                );
                out.push('\n');
            }
            Some(rows) => {
                out.push_str(
                    "<table id=\"losap-hours-table\">\n<thead>\n\
                     <tr><th>Member</th><th>Collateral Duty</th><th>Sleep In</th><th>Stand By</th></tr>\n\
                     </thead>\n<tbody>\n",
                );
                for row in rows {
                    out.push_str(&format!(
                        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                        escape(&row.member),
                        row.collateralduty,
                        row.sleepin,
                        row.standby
                    ));
                }
                out.push_str("</tbody>\n</table>\n");
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Month;

    fn row(member: &str, collateralduty: i64, sleepin: i64, standby: i64) -> MemberHoursSummaryDto {
        MemberHoursSummaryDto {
            member: member.to_string(),
            collateralduty,
            sleepin,
            standby,
        }
    }

    #[test]
    fn renders_one_row_with_cells_in_column_order() {
        let table = HoursTableState::new(ReportScope::AllTime, Some(vec![row("J Doe", 2, 0, 5)]));
        let html = table.render();
        assert!(html.contains("<tr><td>J Doe</td><td>2</td><td>0</td><td>5</td></tr>"));
        assert_eq!(html.matches("<tr><td>").count(), 1);
    }

    #[test]
    fn rows_keep_the_order_received() {
        let table = HoursTableState::new(
            ReportScope::Year(2024),
            Some(vec![row("Zimmer, Ada", 1, 1, 1), row("Abel, Zoe", 3, 0, 2)]),
        );
        let html = table.render();
        assert!(html.find("Zimmer, Ada").unwrap() < html.find("Abel, Zoe").unwrap());
    }

    #[test]
    fn header_follows_the_scope() {
        let month = HoursTableState::new(
            ReportScope::Month {
                year: 2024,
                month: Month::March,
            },
            Some(Vec::new()),
        );
        assert!(month.render().contains("<h2>March 2024 LOSAP Hours</h2>"));

        let year = HoursTableState::new(ReportScope::Year(2024), Some(Vec::new()));
        assert!(year.render().contains("<h2>2024 LOSAP Hours</h2>"));

        let all = HoursTableState::new(ReportScope::AllTime, Some(Vec::new()));
        assert!(all.render().contains("<h2>All LOSAP Hours</h2>"));
    }

    #[test]
    fn filter_is_prefilled_from_the_scope() {
        let table = HoursTableState::new(
            ReportScope::Month {
                year: 2024,
                month: Month::March,
            },
            Some(Vec::new()),
        );
        let html = table.render();
        assert!(html.contains("name=\"year\" type=\"number\" value=\"2024\""));
        assert!(html.contains("name=\"month\" type=\"number\" min=\"1\" max=\"12\" value=\"3\""));
        assert!(html.contains("<a href=\"/losap-hours\">Clear</a>"));
    }

    #[test]
    fn failed_fetch_leaves_the_table_out_entirely() {
        let table = HoursTableState::new(ReportScope::AllTime, None);
        let html = table.render();
        assert!(!html.contains("<table"));
        assert!(html.contains("LOSAP hours are currently unavailable."));
    }

    #[test]
    fn member_names_are_escaped() {
        let table =
            HoursTableState::new(ReportScope::AllTime, Some(vec![row("<b>Doe</b>", 0, 0, 0)]));
        let html = table.render();
        assert!(html.contains("&lt;b&gt;Doe&lt;/b&gt;"));
        assert!(!html.contains("<b>Doe</b>"));
    }
}
