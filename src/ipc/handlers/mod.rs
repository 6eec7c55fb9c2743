pub mod auth;
pub mod core;
pub mod grades;
pub mod notifications;
pub mod stats;
pub mod users;
