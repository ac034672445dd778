pub mod announcements;
pub mod auth;
pub mod dashboard;
pub mod root;
pub mod session;
pub mod users;
