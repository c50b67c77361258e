pub mod delta;
pub mod expected;
pub mod window;
