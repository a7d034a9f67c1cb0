use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use rewards_core::clock::{Clock, FixedClock, SystemClock};
use rewards_core::config::{AppConfig, ConfigOverrides, LoadOptions};
use rewards_core::domain::customer::CustomerId;
use rewards_core::domain::rewards::RewardsPeriodKind;
use rewards_core::errors::{ApplicationError, InterfaceError};
use rewards_core::rewards::DeterministicRewardsEngine;
use rewards_core::service::{CustomerRewardsService, RewardsRequest};
use rewards_store::{FixtureDataset, InMemoryCustomerRepository, InMemoryOrderRepository};
use tracing::error;

use crate::commands::CommandResult;

#[derive(Debug, Clone, Args)]
pub struct PointsArgs {
    #[arg(help = "Customer id to calculate rewards for")]
    pub customer_id: i64,
    #[arg(long, help = "Number of whole months before the current one to include")]
    pub months: Option<u32>,
    #[arg(long, default_value = "month", help = "Rewards period type (only `month` is supported)")]
    pub period_type: String,
    #[arg(long, help = "Evaluate as if today were this date (YYYY-MM-DD)")]
    pub as_of: Option<NaiveDate>,
    #[arg(long, help = "JSON dataset of customers and purchases")]
    pub data: Option<PathBuf>,
    #[arg(long, conflicts_with = "data", help = "Use the built-in demo dataset")]
    pub demo: bool,
}

type Failure = (&'static str, String, u8);

pub fn run(args: PointsArgs) -> CommandResult {
    let options = LoadOptions {
        overrides: ConfigOverrides { fixtures_path: args.data.clone(), ..ConfigOverrides::default() },
        ..LoadOptions::default()
    };
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "points",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };
    crate::init_logging(&config.logging);

    let period_kind = match args.period_type.parse::<RewardsPeriodKind>() {
        Ok(period_kind) => period_kind,
        Err(error) => {
            return CommandResult::failure("points", "bad_request", error.to_string(), 5);
        }
    };

    let today = args.as_of.unwrap_or_else(|| SystemClock.today());
    let dataset = match load_dataset(&config, args.demo, today) {
        Ok(dataset) => dataset,
        Err(error) => {
            return CommandResult::failure("points", "store_load", format!("{error:#}"), 4);
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "points",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let request = RewardsRequest {
        customer_id: CustomerId(args.customer_id),
        period_kind,
        months_back: args.months.unwrap_or(config.rewards.default_months_back),
    };
    let correlation_id = format!("cli-points-{}", args.customer_id);

    let result: Result<_, Failure> = runtime.block_on(async {
        let customers = InMemoryCustomerRepository::default();
        let orders = InMemoryOrderRepository::default();
        dataset
            .install(&customers, &orders)
            .await
            .map_err(|error| ("store_load", error.to_string(), 4u8))?;

        let engine = DeterministicRewardsEngine::new(FixedClock(today))
            .with_description(config.rewards.description.clone());
        let service = CustomerRewardsService::new(customers, orders, engine, &config.rewards);

        service.respond(request).await.map_err(|error| classify(error, &correlation_id))
    });

    match result {
        Ok(response) => CommandResult::document("points", &response),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("points", error_class, message, exit_code)
        }
    }
}

fn load_dataset(
    config: &AppConfig,
    force_demo: bool,
    today: NaiveDate,
) -> anyhow::Result<FixtureDataset> {
    match config.store.fixtures_path.as_deref() {
        Some(path) if !force_demo => FixtureDataset::load_file(path)
            .with_context(|| format!("failed to load rewards dataset for {today}")),
        _ => Ok(FixtureDataset::demo(today)),
    }
}

fn classify(error: ApplicationError, correlation_id: &str) -> Failure {
    let detail = error.to_string();
    let interface = error.into_interface(correlation_id);
    let public =
        format!("{} (correlation id: {})", interface.user_message(), interface.correlation_id());

    match interface {
        InterfaceError::BadRequest { .. } => ("bad_request", detail, 5),
        InterfaceError::ServiceUnavailable { .. } => {
            error!(
                event_name = "cli.points.unavailable",
                correlation_id,
                error = %detail,
                "rewards store unavailable"
            );
            ("store_unavailable", public, 4)
        }
        InterfaceError::Internal { .. } => {
            error!(
                event_name = "cli.points.internal",
                correlation_id,
                error = %detail,
                "rewards calculation failed"
            );
            ("internal", public, 6)
        }
    }
}
