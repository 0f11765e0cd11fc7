mod home;
mod log_hours;
mod losap_hours;
mod members;
mod router;

pub use router::router;
