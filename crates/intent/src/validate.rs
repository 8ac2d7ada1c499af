use catalog::RegionCatalog;
use serde_json::{Map, Value};
use tracing::debug;

use crate::action::{Action, ActionKind, RegionSet, ReplicationMode};
use crate::error::QueryError;

const UNEXPLAINED_ERROR_REASON: &str =
    "The query could not be mapped to a visualization. Try naming a region, country, or city.";

/// Normalizes untrusted structured payloads into [`Action`]s.
///
/// Validation is fail-closed: a single bad field or unknown region code rejects the whole
/// payload. Nothing is coerced; the only repairs are trimming whitespace around codes and
/// collapsing repeated codes.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    catalog: &'a RegionCatalog,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a RegionCatalog) -> Self {
        Self { catalog }
    }

    /// Validates `raw`, demoting every failure to `Action::Error`.
    pub fn validate(&self, raw: &Value) -> Action {
        match self.check(raw) {
            Ok(action) => action,
            Err(err) => {
                debug!(error = ?err, "payload rejected");
                err.into_action()
            }
        }
    }

    /// Like [`Validator::validate`] but keeps the failure typed.
    pub fn check(&self, raw: &Value) -> Result<Action, QueryError> {
        let fields = raw.as_object().ok_or_else(|| {
            QueryError::OracleMalformedResponse("expected a JSON object".to_string())
        })?;

        let tag = match fields.get("action") {
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => return Err(QueryError::invalid_field("action", "expected a string")),
            None => {
                return Err(QueryError::OracleMalformedResponse(
                    "missing action field".to_string(),
                ));
            }
        };
        let kind = ActionKind::from_tag(tag)
            .ok_or_else(|| QueryError::UnsupportedActionTag(tag.to_string()))?;

        let reason = optional_string(fields, "reason")?.unwrap_or_default();

        let action = match kind {
            ActionKind::HighlightRegions => Action::HighlightRegions {
                regions: region_set(fields, 1)?,
                reason,
            },
            ActionKind::CompareRegions => {
                let regions = region_set(fields, 2)?;
                let mode = required_string(fields, "mode")?;
                let mode = ReplicationMode::parse(&mode).ok_or_else(|| {
                    QueryError::invalid_field(
                        "mode",
                        format!("`{mode}` is not one of active-active, active-passive, backup"),
                    )
                })?;
                Action::CompareRegions {
                    regions,
                    mode,
                    reason,
                }
            }
            ActionKind::CameraFly => Action::CameraFly {
                target: fly_target(fields)?,
                reason,
            },
            ActionKind::ProvisionArchitecture => Action::ProvisionArchitecture {
                regions: region_set(fields, 1)?,
                architecture: optional_string_list(fields, "architecture")?.unwrap_or_default(),
                reason,
            },
            ActionKind::LatencySuggestion => Action::LatencySuggestion {
                regions: region_set(fields, 1)?,
                latency_estimate: optional_string(fields, "latency_estimate")?.unwrap_or_default(),
                reason,
            },
            ActionKind::Error if reason.trim().is_empty() => {
                Action::error(UNEXPLAINED_ERROR_REASON)
            }
            ActionKind::Error => Action::Error { reason },
        };

        self.check_regions(&action)?;
        Ok(action)
    }

    fn check_regions(&self, action: &Action) -> Result<(), QueryError> {
        match action
            .region_codes()
            .into_iter()
            .find(|code| !self.catalog.contains(code))
        {
            Some(unknown) => Err(QueryError::UnknownRegionReference(unknown.to_string())),
            None => Ok(()),
        }
    }
}

fn required_string(fields: &Map<String, Value>, field: &'static str) -> Result<String, QueryError> {
    optional_string(fields, field)?
        .ok_or_else(|| QueryError::invalid_field(field, "field is required"))
}

fn optional_string(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<String>, QueryError> {
    match fields.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(QueryError::invalid_field(field, "expected a string")),
    }
}

fn optional_string_list(
    fields: &Map<String, Value>,
    field: &'static str,
) -> Result<Option<Vec<String>>, QueryError> {
    let items = match fields.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(QueryError::invalid_field(field, "expected a list of strings")),
    };

    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| QueryError::invalid_field(field, "expected a list of strings"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn region_set(fields: &Map<String, Value>, min_len: usize) -> Result<RegionSet, QueryError> {
    let codes = optional_string_list(fields, "regions")?
        .ok_or_else(|| QueryError::invalid_field("regions", "field is required"))?;
    let set = RegionSet::new(codes.iter().map(|c| c.trim().to_string()))
        .ok_or_else(|| QueryError::invalid_field("regions", "at least one region is required"))?;

    if set.len() < min_len {
        return Err(QueryError::invalid_field(
            "regions",
            format!("expected at least {min_len} distinct regions, got {}", set.len()),
        ));
    }
    Ok(set)
}

fn fly_target(fields: &Map<String, Value>) -> Result<String, QueryError> {
    let target = required_string(fields, "target")?;
    let target = target.trim();
    if target.is_empty() {
        return Err(QueryError::invalid_field("target", "exactly one region is required"));
    }
    Ok(target.to_string())
}
