pub mod auth_handlers;
pub mod live;
pub mod record_handlers;
