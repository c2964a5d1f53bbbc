//! Synthetic request bodies.

use migration_control_sdk::{ParameterSpec, PayloadProfile, TrafficMode};
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Map, Value, json};

use super::error::DomainError;

const NAMES: [&str; 6] = ["Alice", "Bob", "Charlie", "David", "Eve", "Frank"];

/// Reject profiles that cannot produce a payload.
pub fn validate(profile: &PayloadProfile) -> Result<(), DomainError> {
    match profile {
        PayloadProfile::Transfer {
            account_pool,
            min_amount,
            max_amount,
        } => {
            if *account_pool == 0 {
                return Err(DomainError::validation(
                    "profile.payload.accountPool",
                    "must be at least 1",
                ));
            }
            if min_amount > max_amount {
                return Err(DomainError::validation(
                    "profile.payload.minAmount",
                    format!("{min_amount} exceeds maxAmount {max_amount}"),
                ));
            }
            Ok(())
        }
        PayloadProfile::Parameters { parameters } => {
            if parameters.iter().any(|p| p.name.trim().is_empty()) {
                return Err(DomainError::validation(
                    "profile.payload.parameters",
                    "parameter names must not be empty",
                ));
            }
            Ok(())
        }
    }
}

/// Build one request body for `profile`, tagged with `mode`.
pub fn generate<R: Rng + ?Sized>(profile: &PayloadProfile, mode: TrafficMode, rng: &mut R) -> Value {
    match profile {
        PayloadProfile::Transfer {
            account_pool,
            min_amount,
            max_amount,
        } => {
            let account = rng.random_range(1..=(*account_pool).max(1));
            let amount = rng.random_range(*min_amount..=(*max_amount).max(*min_amount));
            json!({
                "account_number": format!("ACC{account:03}"),
                "amount": amount,
                "mode": mode.as_str(),
            })
        }
        PayloadProfile::Parameters { parameters } => {
            let mut body = Map::new();
            for param in parameters {
                body.insert(param.name.clone(), synthesize(param, rng));
            }
            body.insert("mode".to_owned(), Value::from(mode.as_str()));
            Value::Object(body)
        }
    }
}

/// Guess a plausible value from a parameter's name and declared type.
fn synthesize<R: Rng + ?Sized>(param: &ParameterSpec, rng: &mut R) -> Value {
    let name = param.name.to_lowercase();

    match param.kind.to_lowercase().as_str() {
        "string" => {
            let value = if name.contains("email") {
                format!("user_{}@example.com", rng.random_range(0..10_000))
            } else if name.contains("name") || name.contains("user") {
                let first = NAMES.choose(rng).copied().unwrap_or("Alice");
                format!("{first}_{}", rng.random_range(0..1_000))
            } else if name.contains("phone") {
                format!("+1{}", rng.random_range(0..10_000_000_000_u64))
            } else if name.contains("account") {
                format!("RO{}", rng.random_range(0..100_000_000_000_000_u64))
            } else {
                format!("test_{name}_{}", rng.random_range(0..1_000))
            };
            Value::from(value)
        }
        "number" | "integer" | "float" => {
            if name.contains("amount") || name.contains("price") || name.contains("balance") {
                let cents: u32 = rng.random_range(0..100_000);
                json!(f64::from(cents) / 100.0)
            } else if name.contains("age") {
                json!(rng.random_range(18..=77))
            } else if name.contains("id") {
                json!(rng.random_range(0..1_000))
            } else {
                json!(rng.random_range(0..100))
            }
        }
        "boolean" => Value::from(rng.random_bool(0.5)),
        _ => Value::Null,
    }
}
