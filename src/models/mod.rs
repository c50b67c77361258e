pub mod entry;
pub mod state;
pub mod user;
