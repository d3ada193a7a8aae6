pub mod blogs;
pub mod metrics;
pub mod users;
