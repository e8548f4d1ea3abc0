// src/apify/models.rs
use crate::screener::models::RatioSet;
use crate::utils::error::ApifyError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Every Apify v2 object endpoint wraps its payload in `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// Input for the screener.in actor.
#[derive(Debug, Clone, Serialize)]
pub struct ActorInput {
    pub mode: String,
    pub url: String,
}

impl ActorInput {
    pub fn stock_details(url: impl Into<String>) -> Self {
        Self {
            mode: "getstockdetails".to_string(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRun {
    pub id: String,
    pub status: String,
    pub default_dataset_id: String,
}

impl ActorRun {
    pub fn is_terminal(&self) -> bool {
        matches!(self.status.as_str(), "SUCCEEDED" | "FAILED" | "TIMED-OUT" | "ABORTED")
    }

    pub fn succeeded(&self) -> bool {
        self.status == "SUCCEEDED"
    }
}

/// Reads the ratio set from the first dataset item: its `ratios` field, or
/// the whole item when that field is absent. Later items are ignored.
pub fn ratios_from_items(items: &[Value]) -> Result<RatioSet, ApifyError> {
    let first = items.first().ok_or(ApifyError::EmptyDataset)?;
    if items.len() > 1 {
        tracing::debug!("Ignoring {} extra dataset items", items.len() - 1);
    }

    let ratios = first.get("ratios").unwrap_or(first);
    let object = ratios.as_object().ok_or_else(|| {
        ApifyError::Parse(format!("expected an object of ratios, got: {}", ratios))
    })?;

    Ok(object
        .iter()
        .map(|(name, value)| (name.clone(), display_value(value)))
        .collect())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
