pub mod csrf;
pub mod gate;
pub mod middleware;
pub mod session;
pub mod validate;
