use axum::response::Html;

use crate::components::navbar::NavTarget;
use crate::layout;

pub fn home_page() -> Html<String> {
    layout::page(
        "Home",
        Some(NavTarget::Home),
        "<h2>LOSAP Hour Tracking</h2>\n\
         <p>Log stand-by shifts, collateral duty and sleep-ins, review the LOSAP \
         rollup, and look up individual member hour records.</p>",
    )
}
