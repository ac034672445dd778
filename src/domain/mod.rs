pub mod user;
pub mod announcement;

pub use user::*;
pub use announcement::*;
