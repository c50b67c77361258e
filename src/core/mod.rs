pub mod attendance;
pub mod calculator;
pub mod clock;
pub mod config;
pub mod disqualifier;
pub mod entries;
pub mod identity;
pub mod log;
pub mod scheduler;
pub mod status;
