use crate::api::handlers::entries::{create_collateral_duty, create_sleep_in, create_stand_by};
use crate::api::handlers::hour_types::get_hour_types;
use crate::api::handlers::losap_hours::{
    get_losap_hours_all_time, get_losap_hours_for_month, get_losap_hours_for_year,
};
use crate::api::handlers::members::{get_member, get_member_hours, search_members};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router() -> Router<AppState> {
    Router::<AppState>::new()
        .route("/hour-type", get(get_hour_types))
        .route("/stand-by", post(create_stand_by))
        .route("/collateral-duty", post(create_collateral_duty))
        .route("/sleep-in", post(create_sleep_in))
        .route("/losap-hours/", get(get_losap_hours_all_time))
        .route("/losap-hours/{year}/", get(get_losap_hours_for_year))
        .route("/losap-hours/{year}/{month}/", get(get_losap_hours_for_month))
        .route("/member/", get(search_members))
        .route("/member/{badge_num}", get(get_member))
        .route("/member/{badge_num}/hours/", get(get_member_hours))
}
