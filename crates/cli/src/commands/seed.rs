use std::path::PathBuf;

use chrono::NaiveDate;
use rewards_core::clock::{Clock, SystemClock};
use rewards_store::FixtureDataset;

use crate::commands::CommandResult;

pub fn run(as_of: Option<NaiveDate>, output: Option<PathBuf>) -> CommandResult {
    let today = as_of.unwrap_or_else(|| SystemClock.today());
    let dataset = FixtureDataset::demo(today);

    let Some(path) = output else {
        return CommandResult::document("seed", &dataset);
    };

    match dataset.write_file(&path) {
        Ok(()) => CommandResult::success(
            "seed",
            format!(
                "demo dataset anchored at {today} written to {}: {} customers, {} purchases",
                path.display(),
                dataset.customers.len(),
                dataset.purchases.len()
            ),
        ),
        Err(error) => CommandResult::failure("seed", "store_write", error.to_string(), 4),
    }
}
