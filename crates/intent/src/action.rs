use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The closed set of action tags understood on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    HighlightRegions,
    CompareRegions,
    CameraFly,
    ProvisionArchitecture,
    LatencySuggestion,
    Error,
}

impl ActionKind {
    pub const ALL: [ActionKind; 6] = [
        ActionKind::HighlightRegions,
        ActionKind::CompareRegions,
        ActionKind::CameraFly,
        ActionKind::ProvisionArchitecture,
        ActionKind::LatencySuggestion,
        ActionKind::Error,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ActionKind::HighlightRegions => "highlight_regions",
            ActionKind::CompareRegions => "compare_regions",
            ActionKind::CameraFly => "camera_fly",
            ActionKind::ProvisionArchitecture => "provision_architecture",
            ActionKind::LatencySuggestion => "latency_suggestion",
            ActionKind::Error => "error",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.tag() == tag)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How two compared regions relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReplicationMode {
    /// Both regions serve traffic.
    ActiveActive,
    /// Primary plus warm standby.
    ActivePassive,
    /// Primary plus cold backup.
    Backup,
}

impl ReplicationMode {
    pub const ALL: [ReplicationMode; 3] = [
        ReplicationMode::ActiveActive,
        ReplicationMode::ActivePassive,
        ReplicationMode::Backup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReplicationMode::ActiveActive => "active-active",
            ReplicationMode::ActivePassive => "active-passive",
            ReplicationMode::Backup => "backup",
        }
    }

    /// Exact match only; near misses such as `"Active-Active"` are not accepted.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == value)
    }
}

impl fmt::Display for ReplicationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered pair of region codes joined by an arc.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegionPair {
    pub first: String,
    pub second: String,
}

impl RegionPair {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Non-empty list of distinct region codes.
///
/// Membership is what matters for highlighting, but the order the codes arrived in is
/// kept: the first two entries decide which pair gets an arc.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionSet(Vec<String>);

impl RegionSet {
    /// Builds a set, dropping repeated codes (first occurrence wins).
    ///
    /// Returns `None` when no codes are given.
    pub fn new<I, S>(codes: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for code in codes {
            let code = code.into();
            if !out.contains(&code) {
                out.push(code);
            }
        }
        if out.is_empty() { None } else { Some(Self(out)) }
    }

    pub fn single(code: impl Into<String>) -> Self {
        Self(vec![code.into()])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }

    /// The first two codes, if there are at least two.
    pub fn first_pair(&self) -> Option<RegionPair> {
        match self.0.as_slice() {
            [first, second, ..] => Some(RegionPair::new(first.clone(), second.clone())),
            _ => None,
        }
    }
}

/// A validated visualization instruction.
///
/// Every region code carried by a non-error variant is known to the catalog the action
/// was validated against. `reason` is display text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    HighlightRegions {
        regions: RegionSet,
        reason: String,
    },
    CompareRegions {
        /// At least two codes; only the first two are joined by an arc.
        regions: RegionSet,
        mode: ReplicationMode,
        reason: String,
    },
    CameraFly {
        target: String,
        reason: String,
    },
    ProvisionArchitecture {
        regions: RegionSet,
        architecture: Vec<String>,
        reason: String,
    },
    LatencySuggestion {
        regions: RegionSet,
        latency_estimate: String,
        reason: String,
    },
    Error {
        reason: String,
    },
}

impl Action {
    pub fn error(reason: impl Into<String>) -> Self {
        Action::Error {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::HighlightRegions { .. } => ActionKind::HighlightRegions,
            Action::CompareRegions { .. } => ActionKind::CompareRegions,
            Action::CameraFly { .. } => ActionKind::CameraFly,
            Action::ProvisionArchitecture { .. } => ActionKind::ProvisionArchitecture,
            Action::LatencySuggestion { .. } => ActionKind::LatencySuggestion,
            Action::Error { .. } => ActionKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Action::Error { .. })
    }

    pub fn reason(&self) -> &str {
        match self {
            Action::HighlightRegions { reason, .. }
            | Action::CompareRegions { reason, .. }
            | Action::CameraFly { reason, .. }
            | Action::ProvisionArchitecture { reason, .. }
            | Action::LatencySuggestion { reason, .. }
            | Action::Error { reason } => reason,
        }
    }

    /// Every region code the action refers to, in payload order.
    pub fn region_codes(&self) -> Vec<&str> {
        match self {
            Action::HighlightRegions { regions, .. }
            | Action::CompareRegions { regions, .. }
            | Action::ProvisionArchitecture { regions, .. }
            | Action::LatencySuggestion { regions, .. } => regions.iter().collect(),
            Action::CameraFly { target, .. } => vec![target.as_str()],
            Action::Error { .. } => Vec::new(),
        }
    }

    /// Renders the action in the oracle's wire shape.
    ///
    /// Feeding the result back through the validator yields an identical action.
    pub fn to_payload(&self) -> Value {
        let tag = self.kind().tag();
        match self {
            Action::HighlightRegions { regions, reason } => json!({
                "action": tag,
                "regions": regions.as_slice(),
                "reason": reason,
            }),
            Action::CompareRegions {
                regions,
                mode,
                reason,
            } => json!({
                "action": tag,
                "regions": regions.as_slice(),
                "mode": mode.as_str(),
                "reason": reason,
            }),
            Action::CameraFly { target, reason } => json!({
                "action": tag,
                "target": target,
                "reason": reason,
            }),
            Action::ProvisionArchitecture {
                regions,
                architecture,
                reason,
            } => json!({
                "action": tag,
                "regions": regions.as_slice(),
                "architecture": architecture,
                "reason": reason,
            }),
            Action::LatencySuggestion {
                regions,
                latency_estimate,
                reason,
            } => json!({
                "action": tag,
                "regions": regions.as_slice(),
                "latency_estimate": latency_estimate,
                "reason": reason,
            }),
            Action::Error { reason } => json!({
                "action": tag,
                "reason": reason,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tags_are_unique_and_resolve_back() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ActionKind::from_tag("teleport"), None);
        assert_eq!(ActionKind::from_tag("Camera_Fly"), None);
    }

    #[test]
    fn replication_mode_is_strict() {
        assert_eq!(
            ReplicationMode::parse("active-passive"),
            Some(ReplicationMode::ActivePassive)
        );
        assert_eq!(ReplicationMode::parse("sideways"), None);
        assert_eq!(ReplicationMode::parse("Backup"), None);
        assert_eq!(
            serde_json::to_value(ReplicationMode::ActiveActive).unwrap(),
            json!("active-active")
        );
    }

    #[test]
    fn region_set_dedups_and_keeps_order() {
        let set = RegionSet::new(["b", "a", "b", "c"]).unwrap();
        assert_eq!(set.as_slice(), &["b", "a", "c"]);
        assert_eq!(set.first_pair(), Some(RegionPair::new("b", "a")));
        assert!(RegionSet::new(Vec::<String>::new()).is_none());
        assert_eq!(RegionSet::single("x").first_pair(), None);
    }

    #[test]
    fn payload_uses_wire_field_names() {
        let action = Action::LatencySuggestion {
            regions: RegionSet::single("ap-south-1"),
            latency_estimate: "10-40ms".into(),
            reason: "closest".into(),
        };
        assert_eq!(
            action.to_payload(),
            json!({
                "action": "latency_suggestion",
                "regions": ["ap-south-1"],
                "latency_estimate": "10-40ms",
                "reason": "closest",
            })
        );
    }

    #[test]
    fn region_codes_cover_every_variant() {
        let fly = Action::CameraFly {
            target: "eu-west-1".into(),
            reason: String::new(),
        };
        assert_eq!(fly.region_codes(), vec!["eu-west-1"]);
        assert!(Action::error("nope").region_codes().is_empty());
        assert_eq!(Action::error("nope").reason(), "nope");
    }
}
