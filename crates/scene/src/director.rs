use std::collections::BTreeSet;

use intent::{Action, ActionKind, RegionPair};
use runtime::{EventBus, Stamped};
use serde::Serialize;
use tracing::debug;

/// Everything the render layer needs to know about the current visualization.
///
/// Renderers compare successive states by value and redraw only when they differ.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneState {
    pub highlighted: BTreeSet<String>,
    pub fly_target: Option<String>,
    pub comparison_pair: Option<RegionPair>,
    pub selected_region: Option<String>,
}

impl SceneState {
    pub fn is_highlighted(&self, code: &str) -> bool {
        self.highlighted.contains(code)
    }

    pub fn is_neutral(&self) -> bool {
        self.highlighted.is_empty() && self.fly_target.is_none() && self.comparison_pair.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneEvent {
    ActionApplied { kind: ActionKind, revision: u64 },
    RegionSelected { code: String },
    SelectionCleared,
}

/// Owns [`SceneState`] and is the only thing allowed to change it.
///
/// Actions replace the three visualization fields wholesale. Marker selection is a separate
/// channel: actions never touch it and selection never touches anything else.
#[derive(Debug, Default)]
pub struct SceneDirector {
    state: SceneState,
    revision: u64,
    events: EventBus<SceneEvent>,
}

impl SceneDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    /// Incremented whenever the state value changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies `action` and returns `true` if the state changed.
    pub fn apply(&mut self, action: &Action) -> bool {
        let (highlighted, fly_target, comparison_pair) = match action {
            Action::HighlightRegions { regions, .. } => (codes(regions.iter()), None, None),
            Action::CompareRegions { regions, .. } => {
                (codes(regions.iter()), None, regions.first_pair())
            }
            Action::CameraFly { target, .. } => (
                codes([target.as_str()]),
                Some(target.clone()),
                None,
            ),
            Action::ProvisionArchitecture { regions, .. } => {
                (codes(regions.iter()), None, regions.first_pair())
            }
            Action::LatencySuggestion { regions, .. } => (codes(regions.iter()), None, None),
            Action::Error { .. } => (BTreeSet::new(), None, None),
        };

        let next = SceneState {
            highlighted,
            fly_target,
            comparison_pair,
            selected_region: self.state.selected_region.clone(),
        };
        let changed = self.replace(next);
        debug!(
            action = %action.kind(),
            changed,
            revision = self.revision,
            "applied action"
        );
        self.events.emit(SceneEvent::ActionApplied {
            kind: action.kind(),
            revision: self.revision,
        });
        changed
    }

    /// Marks `code` as the selected marker. Returns `true` if the selection changed.
    pub fn select_region(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        let next = SceneState {
            selected_region: Some(code.clone()),
            ..self.state.clone()
        };
        let changed = self.replace(next);
        if changed {
            debug!(%code, "region selected");
            self.events.emit(SceneEvent::RegionSelected { code });
        }
        changed
    }

    pub fn dismiss_selection(&mut self) -> bool {
        if self.state.selected_region.is_none() {
            return false;
        }
        self.state.selected_region = None;
        self.revision += 1;
        self.events.emit(SceneEvent::SelectionCleared);
        true
    }

    /// The region pair the arc builder should join, if any.
    pub fn arc_request(&self) -> Option<&RegionPair> {
        self.state.comparison_pair.as_ref()
    }

    /// The region the camera should fly to, if any.
    pub fn fly_request(&self) -> Option<&str> {
        self.state.fly_target.as_deref()
    }

    pub fn drain_events(&mut self) -> Vec<Stamped<SceneEvent>> {
        self.events.drain()
    }

    fn replace(&mut self, next: SceneState) -> bool {
        if next == self.state {
            return false;
        }
        self.state = next;
        self.revision += 1;
        true
    }
}

fn codes<'a>(iter: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    iter.into_iter().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intent::{RegionSet, ReplicationMode};
    use pretty_assertions::assert_eq;

    fn set(codes: &[&str]) -> BTreeSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    fn highlight(codes: &[&str]) -> Action {
        Action::HighlightRegions {
            regions: RegionSet::new(codes.iter().copied()).unwrap(),
            reason: String::new(),
        }
    }

    fn fly(code: &str) -> Action {
        Action::CameraFly {
            target: code.into(),
            reason: String::new(),
        }
    }

    fn provision(codes: &[&str]) -> Action {
        Action::ProvisionArchitecture {
            regions: RegionSet::new(codes.iter().copied()).unwrap(),
            architecture: vec!["EKS".into()],
            reason: String::new(),
        }
    }

    #[test]
    fn later_action_replaces_earlier_highlight() {
        let mut director = SceneDirector::new();
        director.apply(&highlight(&["ap-south-1"]));
        director.apply(&fly("eu-west-1"));

        let state = director.state();
        assert_eq!(state.highlighted, set(&["eu-west-1"]));
        assert_eq!(state.comparison_pair, None);
        assert_eq!(state.fly_target.as_deref(), Some("eu-west-1"));
        assert_eq!(director.fly_request(), Some("eu-west-1"));
    }

    #[test]
    fn compare_sets_pair_and_clears_fly_target() {
        let mut director = SceneDirector::new();
        director.apply(&fly("eu-west-1"));
        director.apply(&Action::CompareRegions {
            regions: RegionSet::new(["ap-northeast-1", "ap-northeast-2", "ap-southeast-1"])
                .unwrap(),
            mode: ReplicationMode::ActiveActive,
            reason: String::new(),
        });

        let state = director.state();
        assert_eq!(
            state.highlighted,
            set(&["ap-northeast-1", "ap-northeast-2", "ap-southeast-1"])
        );
        assert_eq!(
            director.arc_request(),
            Some(&RegionPair::new("ap-northeast-1", "ap-northeast-2"))
        );
        assert_eq!(director.fly_request(), None);
    }

    #[test]
    fn provisioning_needs_two_regions_for_an_arc() {
        let mut director = SceneDirector::new();
        director.apply(&provision(&["us-east-1"]));
        assert_eq!(director.state().comparison_pair, None);
        assert_eq!(director.state().highlighted, set(&["us-east-1"]));

        director.apply(&provision(&["us-east-1", "eu-central-1", "ap-northeast-1"]));
        assert_eq!(
            director.state().comparison_pair,
            Some(RegionPair::new("us-east-1", "eu-central-1"))
        );

        director.apply(&provision(&["us-east-1"]));
        assert_eq!(director.state().comparison_pair, None);
    }

    #[test]
    fn latency_suggestion_only_highlights() {
        let mut director = SceneDirector::new();
        director.apply(&provision(&["us-east-1", "eu-central-1"]));
        director.apply(&Action::LatencySuggestion {
            regions: RegionSet::new(["eu-west-2"]).unwrap(),
            latency_estimate: "< 20ms".into(),
            reason: String::new(),
        });
        let state = director.state();
        assert_eq!(state.highlighted, set(&["eu-west-2"]));
        assert_eq!(state.comparison_pair, None);
        assert_eq!(state.fly_target, None);
    }

    #[test]
    fn error_reverts_to_neutral() {
        let mut director = SceneDirector::new();
        director.apply(&fly("eu-west-1"));
        assert!(!director.state().is_neutral());

        assert!(director.apply(&Action::error("oracle unavailable")));
        assert!(director.state().is_neutral());
        assert!(!director.apply(&Action::error("again")));
    }

    #[test]
    fn selection_is_orthogonal_to_actions() {
        let mut director = SceneDirector::new();
        director.apply(&highlight(&["us-west-2", "us-east-2"]));
        let before = director.state().clone();

        assert!(director.select_region("us-west-2"));
        assert_eq!(director.state().highlighted, before.highlighted);
        assert_eq!(director.state().selected_region.as_deref(), Some("us-west-2"));

        director.apply(&Action::error("boom"));
        assert_eq!(director.state().selected_region.as_deref(), Some("us-west-2"));

        assert!(director.dismiss_selection());
        assert!(!director.dismiss_selection());
        assert_eq!(director.state().selected_region, None);
    }

    #[test]
    fn revision_tracks_value_changes_only() {
        let mut director = SceneDirector::new();
        assert!(director.apply(&highlight(&["eu-north-1"])));
        let rev = director.revision();

        assert!(!director.apply(&highlight(&["eu-north-1"])));
        assert_eq!(director.revision(), rev);
        assert!(director.select_region("eu-north-1"));
        assert_eq!(director.revision(), rev + 1);
    }

    #[test]
    fn emits_events_in_order() {
        let mut director = SceneDirector::new();
        director.apply(&fly("sa-east-1"));
        director.select_region("sa-east-1");
        director.dismiss_selection();

        let events: Vec<_> = director.drain_events().into_iter().map(|s| s.event).collect();
        assert_eq!(
            events,
            vec![
                SceneEvent::ActionApplied {
                    kind: ActionKind::CameraFly,
                    revision: 1,
                },
                SceneEvent::RegionSelected {
                    code: "sa-east-1".into(),
                },
                SceneEvent::SelectionCleared,
            ]
        );
        assert!(director.drain_events().is_empty());
    }

    #[test]
    fn state_serializes_with_render_field_names() {
        let mut director = SceneDirector::new();
        director.apply(&fly("eu-west-1"));
        let value = serde_json::to_value(director.state()).unwrap();
        assert_eq!(value["flyTarget"], "eu-west-1");
        assert!(value["comparisonPair"].is_null());
        assert_eq!(value["highlighted"][0], "eu-west-1");
    }

    struct UnreachableOracle;

    #[async_trait::async_trait]
    impl intent::Oracle for UnreachableOracle {
        async fn interpret(
            &self,
            _request: intent::OracleRequest<'_>,
        ) -> Result<String, intent::OracleError> {
            Err(intent::OracleError::Transport("connection reset".into()))
        }
    }

    #[tokio::test]
    async fn oracle_failure_leaves_state_until_applied() {
        let catalog = std::sync::Arc::new(catalog::RegionCatalog::bundled().unwrap());
        let orchestrator = intent::QueryOrchestrator::new(UnreachableOracle, catalog);
        let mut director = SceneDirector::new();
        director.apply(&fly("eu-west-1"));
        let before = director.state().clone();

        let action = orchestrator.submit("Fly me to Ireland", "key").await;
        assert!(action.is_error());
        assert_eq!(director.state(), &before);

        assert!(director.apply(&action));
        assert!(director.state().is_neutral());
    }
}
