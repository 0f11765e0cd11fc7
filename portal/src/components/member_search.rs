use shared::MIN_SEARCH_LEN;
use shared::dto::MemberDto;

use crate::layout::escape;

/// Search box state. Each acted-on input is issued under a
/// monotonically increasing sequence number, and a response only
/// lands if it answers the most recently issued request, so a slow
/// early response can never clobber a newer one.
#[derive(Debug, Default)]
pub struct MemberSearchState {
    query: String,
    next_seq: u64,
    latest_issued: Option<u64>,
    results: Vec<MemberDto>,
    visible: bool,
}

impl MemberSearchState {
    /// Feeds an input change and returns the request to issue, if any.
    /// A term shorter than the minimum clears and hides the result
    /// list and issues nothing; outstanding requests are orphaned.
    pub fn observe_input(&mut self, raw: &str) -> Option<(u64, String)> {
        let term = raw.trim();
        self.query = term.to_string();
        if term.chars().count() < MIN_SEARCH_LEN {
            self.results.clear();
            self.visible = false;
            self.latest_issued = None;
            return None;
        }
        self.next_seq += 1;
        self.latest_issued = Some(self.next_seq);
        Some((self.next_seq, term.to_string()))
    }

    /// Applies a response, returning whether it landed. Responses to
    /// anything but the latest issued request are discarded.
    pub fn apply_results(&mut self, seq: u64, members: Vec<MemberDto>) -> bool {
        if self.latest_issued != Some(seq) {
            return false;
        }
        self.results = members;
        self.visible = true;
        true
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "<form id=\"member-search\" method=\"get\" action=\"/member-hour\">\n\
             <label for=\"search\">Member search</label>\n\
             <input id=\"search\" name=\"search\" type=\"text\" minlength=\"{MIN_SEARCH_LEN}\" \
             value=\"{}\" placeholder=\"Name or badge number\">\n\
             <button type=\"submit\">Search</button>\n\
             </form>\n",
            escape(&self.query)
        );
        if self.visible {
            out.push_str("<ul id=\"search-results\">\n");
            for member in &self.results {
                out.push_str(&format!(
                    "<li><a href=\"/member-hour/{}\">{}</a></li>\n",
                    member.badge_num,
                    escape(&member.full_member())
                ));
            }
            out.push_str("</ul>\n");
        }
        out
    }
}
