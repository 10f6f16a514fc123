mod health;
mod watches;

pub use health::health_router;
pub use watches::watch_router;
