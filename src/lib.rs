// Library for the zraminfo/zramtracker binaries and tests

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod memlock;
pub mod models;
pub mod policy;
pub mod report;
pub mod worker;
pub mod zram_repo;
