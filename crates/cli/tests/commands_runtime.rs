use std::env;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use chrono::NaiveDate;
use rewards_cli::commands::points::PointsArgs;
use rewards_cli::commands::{config, points, seed};
use serde_json::Value;
use tempfile::TempDir;

fn as_of() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 6, 15)
}

fn demo_args(customer_id: i64, months: Option<u32>) -> PointsArgs {
    PointsArgs {
        customer_id,
        months,
        period_type: "month".to_string(),
        as_of: as_of(),
        data: None,
        demo: true,
    }
}

#[test]
fn points_returns_response_for_demo_customer() {
    with_env(&[], || {
        let result = points::run(demo_args(1, Some(3)));
        assert_eq!(result.exit_code, 0, "expected successful points run");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["customerId"], 1);
        assert_eq!(payload["personalInfo"]["customerName"], "Test Name 1");
        assert_eq!(payload["rewards"]["rewardsPeriodType"], "MONTH");
        assert_eq!(payload["rewards"]["description"], "Customer Rewards Points per month");
        assert_eq!(payload["rewards"]["totalPoints"], 520);
        assert_eq!(payload["rewards"]["totalAmount"], "460.00");

        let months = payload["rewards"]["monthlyPointsList"].as_array().expect("month list");
        let points: Vec<u64> = months.iter().filter_map(|month| month["points"].as_u64()).collect();
        assert_eq!(points, vec![0, 70, 450]);
        assert_eq!(months[0]["month"], 3);
        assert_eq!(months[0]["year"], 2024);
    });
}

#[test]
fn points_uses_configured_default_window_and_description() {
    with_env(
        &[("REWARDS_DEFAULT_MONTHS_BACK", "11"), ("REWARDS_DESCRIPTION", "Loyalty points")],
        || {
            let result = points::run(demo_args(1, None));
            assert_eq!(result.exit_code, 0, "expected successful points run");

            let payload = parse_payload(&result.output);
            assert_eq!(payload["rewards"]["description"], "Loyalty points");
            assert_eq!(payload["rewards"]["totalPoints"], 1120);
            assert_eq!(
                payload["rewards"]["monthlyPointsList"].as_array().map(Vec::len),
                Some(11)
            );
        },
    );
}

#[test]
fn points_rejects_unknown_customer_as_bad_request() {
    with_env(&[], || {
        let result = points::run(demo_args(99, Some(3)));
        assert_eq!(result.exit_code, 5, "expected bad request exit code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "points");
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "bad_request");
        assert!(payload["message"].as_str().unwrap_or_default().contains("99"));
    });
}

#[test]
fn points_rejects_unsupported_period_type_and_empty_window() {
    with_env(&[], || {
        let mut weekly = demo_args(1, Some(3));
        weekly.period_type = "week".to_string();
        let result = points::run(weekly);
        assert_eq!(result.exit_code, 5);
        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "bad_request");
        assert!(payload["message"].as_str().unwrap_or_default().contains("`week`"));

        let result = points::run(demo_args(1, Some(0)));
        assert_eq!(result.exit_code, 5);
        assert_eq!(parse_payload(&result.output)["error_class"], "bad_request");
    });
}

#[test]
fn points_returns_config_failure_for_invalid_env() {
    with_env(&[("REWARDS_MAX_MONTHS_BACK", "500")], || {
        let result = points::run(demo_args(1, Some(3)));
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "points");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

#[test]
fn points_reports_missing_dataset_as_store_failure() {
    with_env(&[], || {
        let mut args = demo_args(1, Some(3));
        args.demo = false;
        args.data = Some(PathBuf::from("does/not/exist.json"));

        let result = points::run(args);
        assert_eq!(result.exit_code, 4, "expected store failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["error_class"], "store_load");
        assert!(payload["message"].as_str().unwrap_or_default().contains("exist.json"));
    });
}

#[test]
fn seeded_file_reproduces_demo_totals() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("customers.json");

        let seeded = seed::run(as_of(), Some(path.clone()));
        assert_eq!(seeded.exit_code, 0, "expected seed to write file");
        let payload = parse_payload(&seeded.output);
        assert_eq!(payload["command"], "seed");
        assert_eq!(payload["status"], "ok");

        let mut args = demo_args(1, Some(6));
        args.demo = false;
        args.data = Some(path);
        let result = points::run(args);
        assert_eq!(result.exit_code, 0, "expected points from seeded file");
        assert_eq!(parse_payload(&result.output)["rewards"]["totalPoints"], 570);
    });
}

#[test]
fn seed_prints_dataset_when_no_output_given() {
    let first = seed::run(as_of(), None);
    let second = seed::run(as_of(), None);
    assert_eq!(first.exit_code, 0);
    assert_eq!(first.output, second.output);

    let payload = parse_payload(&first.output);
    assert_eq!(payload["customers"].as_array().map(Vec::len), Some(4));
    assert_eq!(payload["purchases"].as_array().map(Vec::len), Some(8));
}

#[test]
fn points_reports_amount_overflow_as_internal_failure() {
    with_env(&[], || {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("huge.json");
        std::fs::write(
            &path,
            r#"{
  "customers": [{"id": 1, "name": "Test Name 1", "phone_number": "100-000-0001"}],
  "purchases": [
    {"id": 1, "customer_id": 1, "amount": "79228162514264337593543950335",
     "transaction_time": "2024-05-03T10:00:00Z"},
    {"id": 2, "customer_id": 1, "amount": "79228162514264337593543950335",
     "transaction_time": "2024-05-20T10:00:00Z"}
  ]
}"#,
        )
        .expect("write dataset");

        let mut args = demo_args(1, Some(1));
        args.demo = false;
        args.data = Some(path);
        let result = points::run(args);
        assert_eq!(result.exit_code, 6, "expected internal failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["status"], "error");
        assert_eq!(payload["error_class"], "internal");
        assert!(payload["message"].as_str().unwrap_or_default().contains("cli-points-1"));
    });
}

#[test]
fn config_attributes_env_aliases() {
    with_env(&[("REWARDS_LOG_LEVEL", "debug")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 0);

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["status"], "ok");
        let message = payload["message"].as_str().unwrap_or_default();
        assert!(message.contains("- logging.level = debug (source: env (REWARDS_LOG_LEVEL))"));
        assert!(message.contains("- rewards.default_months_back = 3 (source: default)"));
        assert!(message.contains("- store.fixtures_path = <demo dataset> (source: default)"));
    });
}

#[test]
fn config_returns_validation_failure_payload() {
    with_env(&[("REWARDS_MAX_MONTHS_BACK", "500")], || {
        let result = config::run();
        assert_eq!(result.exit_code, 2, "expected config validation failure code");

        let payload = parse_payload(&result.output);
        assert_eq!(payload["command"], "config");
        assert_eq!(payload["error_class"], "config_validation");
    });
}

fn parse_payload(output: &str) -> Value {
    serde_json::from_str(output).expect("command output should be valid JSON")
}

fn with_env(vars: &[(&str, &str)], test_fn: impl FnOnce()) {
    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let _guard =
        ENV_LOCK.get_or_init(|| Mutex::new(())).lock().expect("env mutex should not be poisoned");

    let keys = [
        "REWARDS_DEFAULT_MONTHS_BACK",
        "REWARDS_MAX_MONTHS_BACK",
        "REWARDS_DESCRIPTION",
        "REWARDS_STORE_FIXTURES_PATH",
        "REWARDS_LOGGING_LEVEL",
        "REWARDS_LOGGING_FORMAT",
        "REWARDS_LOG_LEVEL",
        "REWARDS_LOG_FORMAT",
    ];

    let previous_values: Vec<(&str, Option<String>)> =
        keys.iter().map(|key| (*key, env::var(key).ok())).collect();

    for key in &keys {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test_fn();

    for (key, value) in previous_values {
        if let Some(value) = value {
            env::set_var(key, value);
        } else {
            env::remove_var(key);
        }
    }
}
