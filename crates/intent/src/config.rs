use std::env;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Where and how the oracle is reached. Credentials are not part of the configuration;
/// they travel with each query.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    /// Sampling temperature; `None` leaves the service default.
    pub temperature: Option<f64>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: None,
        }
    }
}

impl OracleConfig {
    /// Reads `ORACLE_BASE_URL`, `ORACLE_MODEL` and `ORACLE_TEMPERATURE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: non_empty(lookup("ORACLE_BASE_URL"))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: non_empty(lookup("ORACLE_MODEL")).unwrap_or(defaults.model),
            temperature: non_empty(lookup("ORACLE_TEMPERATURE"))
                .and_then(|v| v.parse::<f64>().ok())
                .filter(|t| t.is_finite() && *t >= 0.0),
        }
    }

    pub fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_MODEL, OracleConfig};
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = OracleConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg, OracleConfig::default());
        assert_eq!(cfg.model, DEFAULT_MODEL);
    }

    #[test]
    fn overrides_from_lookup() {
        let cfg = OracleConfig::from_lookup(lookup(&[
            ("ORACLE_BASE_URL", "http://localhost:8080/v1/"),
            ("ORACLE_MODEL", "test-model"),
            ("ORACLE_TEMPERATURE", "0.2"),
        ]));
        assert_eq!(
            cfg.generate_url(),
            "http://localhost:8080/v1/models/test-model:generateContent"
        );
        assert_eq!(cfg.temperature, Some(0.2));
    }

    #[test]
    fn ignores_invalid_temperature() {
        let cfg = OracleConfig::from_lookup(lookup(&[("ORACLE_TEMPERATURE", "warm")]));
        assert_eq!(cfg.temperature, None);
        let cfg = OracleConfig::from_lookup(lookup(&[("ORACLE_TEMPERATURE", "-1")]));
        assert_eq!(cfg.temperature, None);
    }
}
