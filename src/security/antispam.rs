//! Bot heuristics checked at the edge before anything else.
//!
//! A request that trips one of these is answered with a normal success
//! body and dropped. The client never learns it was detected.

use serde_json::{Map, Value};

use crate::config::AntiSpamConfig;
use crate::submission::fields;

/// Why a submission was treated as automated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotSignal {
    /// The hidden honeypot field carried a value.
    Honeypot,
    /// The form was submitted sooner than a person could fill it.
    TooFast { elapsed_ms: i64 },
}

impl BotSignal {
    pub fn label(&self) -> &'static str {
        match self {
            BotSignal::Honeypot => "honeypot",
            BotSignal::TooFast { .. } => "too_fast",
        }
    }
}

/// Run the honeypot check, then the timing check.
pub fn detect_bot(
    payload: &Map<String, Value>,
    now_ms: u64,
    policy: &AntiSpamConfig,
) -> Option<BotSignal> {
    if honeypot_filled(payload.get(fields::HONEYPOT)) {
        return Some(BotSignal::Honeypot);
    }

    let loaded_at = load_time(payload.get(fields::LOAD_TIME))?;
    let elapsed_ms = (now_ms as i64).saturating_sub(loaded_at);
    if elapsed_ms < policy.min_fill_ms as i64 {
        return Some(BotSignal::TooFast { elapsed_ms });
    }
    None
}

fn honeypot_filled(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Client-reported load time. Missing, zero, negative, non-finite or
/// unparseable values skip the timing check.
fn load_time(value: Option<&Value>) -> Option<i64> {
    let millis = match value? {
        Value::Number(n) => match n.as_i64() {
            Some(millis) => millis as f64,
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    (millis.is_finite() && millis > 0.0).then_some(millis as i64)
}
