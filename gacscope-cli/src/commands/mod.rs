pub mod common;
pub mod inspect;
pub mod list;
pub mod names;
pub mod resolve;
