pub mod codec;
pub mod export;
pub mod types;

pub use codec::*;
pub use export::*;
pub use types::*;
