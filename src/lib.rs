pub mod compare;
pub mod exec;
pub mod logging;
pub mod runner;
pub mod scenario;
pub mod shared;
