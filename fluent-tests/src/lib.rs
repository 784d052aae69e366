mod enums;
mod errors;
mod planets;
mod transactions;
mod values;

use crate::{
    enums::enums,
    errors::{errors, shutdown},
    planets::planets,
    transactions::transactions,
    values::values,
};
pub use fluent_core::silent_logs;
use fluent_core::Driver;
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<D: Driver>(driver: D) {
    planets(&driver).await;
    values(&driver).await;
    transactions(&driver).await;
    enums(&driver).await;
    errors(&driver).await;
    shutdown(&driver).await;
}
