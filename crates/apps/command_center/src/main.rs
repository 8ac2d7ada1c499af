use std::sync::Arc;

use catalog::RegionCatalog;
use clap::Parser;
use foundation::math::Vec3;
use intent::{Action, GeminiOracle, OracleConfig, QueryOrchestrator};
use runtime::FrameClock;
use scene::{SceneComposer, SceneConfig, SceneDirector, SceneFrame};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns infrastructure intents into globe scene updates")]
struct Args {
    /// API key for the interpretation service
    #[arg(long, env = "ORACLE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Model name (overrides ORACLE_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Frame rate used to play back camera flights
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Include the full marker layout in every scene update
    #[arg(long)]
    markers: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Query(String),
    Select(String),
    Dismiss,
    Quit,
    Blank,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((":select", code)) => Command::Select(code.trim().to_string()),
        _ => match line {
            "" => Command::Blank,
            ":dismiss" => Command::Dismiss,
            ":quit" | ":q" => Command::Quit,
            _ => Command::Query(line.to_string()),
        },
    }
}

fn vec3(v: Vec3) -> Value {
    json!(v.as_array())
}

fn frame_json(frame: &SceneFrame, with_markers: bool) -> Value {
    let arc = frame.arc.as_ref().map(|arc| {
        json!({
            "from": arc.from,
            "to": arc.to,
            "points": arc.points.iter().copied().map(vec3).collect::<Vec<_>>(),
        })
    });
    let flight = frame.camera_flight.as_ref().map(|flight| {
        json!({
            "target": flight.target,
            "destination": vec3(flight.destination),
        })
    });
    let mut out = json!({ "arc": arc, "cameraFlight": flight });
    if with_markers {
        out["markers"] = frame
            .markers
            .iter()
            .map(|m| {
                json!({
                    "region": m.code,
                    "position": vec3(m.position),
                    "highlighted": m.highlighted,
                    "selected": m.selected,
                    "availabilityZones": m.az_towers.iter().copied().map(vec3).collect::<Vec<_>>(),
                })
            })
            .collect();
    }
    out
}

/// Scene side of an interactive session: applies resolved commands and renders updates.
struct Session {
    catalog: Arc<RegionCatalog>,
    director: SceneDirector,
    composer: SceneComposer,
    clock: FrameClock,
    dt_s: f64,
    with_markers: bool,
}

impl Session {
    fn new(catalog: Arc<RegionCatalog>, fps: u32, with_markers: bool) -> Self {
        Self {
            catalog,
            director: SceneDirector::new(),
            composer: SceneComposer::new(SceneConfig::default()),
            clock: FrameClock::default(),
            dt_s: 1.0 / f64::from(fps.max(1)),
            with_markers,
        }
    }

    /// Applies a resolved query. Always reports the action, even when the scene is unchanged.
    fn resolve(&mut self, action: &Action) -> Value {
        self.director.apply(action);
        let mut out = self.update(Some(action));
        if action.is_error() {
            out["error"] = json!(action.reason());
        }
        out
    }

    fn select(&mut self, code: &str) -> Option<Value> {
        if !self.catalog.contains(code) {
            warn!(%code, "cannot select unknown region");
            return None;
        }
        self.director.select_region(code);
        self.scene_change()
    }

    fn dismiss(&mut self) -> Option<Value> {
        self.director.dismiss_selection();
        self.scene_change()
    }

    fn scene_change(&mut self) -> Option<Value> {
        let out = self.update(None);
        out.get("scene").is_some().then_some(out)
    }

    fn update(&mut self, action: Option<&Action>) -> Value {
        let mut out = json!({
            "action": action.map(Action::to_payload),
            "state": self.director.state(),
        });

        if let Some(frame) = self.composer.compose(&self.catalog, self.director.state()) {
            out["scene"] = frame_json(&frame, self.with_markers);
            if frame.camera_flight.is_some() {
                let mut frames = 0u32;
                while self.composer.camera().is_animating() {
                    self.composer.tick_frame(self.clock.tick(self.dt_s));
                    frames += 1;
                }
                out["camera"] = json!({
                    "position": vec3(self.composer.camera().position()),
                    "lookAt": vec3(self.composer.camera().pose().look_at),
                    "frames": frames,
                });
            }
        }

        for event in self.director.drain_events() {
            info!(seq = event.seq, event = ?event.event, "scene event");
        }
        out
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut oracle_config = OracleConfig::from_env();
    if let Some(model) = args.model.clone() {
        oracle_config.model = model;
    }
    info!(model = %oracle_config.model, "starting command center");

    let catalog = Arc::new(RegionCatalog::bundled()?);
    let orchestrator = QueryOrchestrator::new(GeminiOracle::new(oracle_config), catalog.clone());
    let mut session = Session::new(catalog, args.fps, args.markers);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let out = match parse_command(&line) {
            Command::Blank => continue,
            Command::Quit => break,
            Command::Dismiss => session.dismiss(),
            Command::Select(code) => session.select(&code),
            Command::Query(text) => {
                let submission = orchestrator.dispatch(&text, &args.api_key).await;
                if !orchestrator.is_current(submission.ticket) {
                    warn!(ticket = submission.ticket.get(), "dropping superseded result");
                    continue;
                }
                Some(session.resolve(&submission.action))
            }
        };

        if let Some(out) = out {
            println!("{}", serde_json::to_string(&out)?);
        }
    }

    Ok(())
}
