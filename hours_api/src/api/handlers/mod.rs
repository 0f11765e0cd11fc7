pub mod entries;
pub mod hour_types;
pub mod losap_hours;
pub mod members;
