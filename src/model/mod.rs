mod event;
mod filter;
mod lead;
pub mod timestamp;

pub use event::*;
pub use filter::*;
pub use lead::*;
