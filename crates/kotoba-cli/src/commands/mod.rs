pub mod class;
pub mod content;
pub mod dispatch;
pub mod enroll;
pub mod link;
pub mod progress;
pub mod schema;
pub mod shared;
pub mod textbook;
pub mod user;
