pub mod auth;
pub mod cache;
pub mod credentials;
pub mod error;
pub mod middleware;
pub mod router;
pub mod shares;
pub mod statuses;
