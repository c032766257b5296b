mod flow;
mod hooks;
mod placement;

use anyhow::Result;
use serde::Serialize;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tour_engine::{
    LayoutSnapshot, MemoryFlagStore, RecordingSurface, StaticLayout, TourConfig, TourController,
    TourDefinition,
};

/// Inputs every scenario runs against.
#[derive(Debug, Clone)]
pub struct ScenarioCtx {
    pub definition: TourDefinition,
    pub layout: LayoutSnapshot,
    pub config: TourConfig,
    pub verbose: bool,
}

pub type Controller =
    TourController<Rc<MemoryFlagStore>, Rc<StaticLayout>, Rc<RecordingSurface>>;

/// A fresh controller with inspectable collaborators.
pub struct Harness {
    pub store: Rc<MemoryFlagStore>,
    pub layout: Rc<StaticLayout>,
    pub surface: Rc<RecordingSurface>,
    pub controller: Controller,
}

impl ScenarioCtx {
    pub fn harness(&self) -> Result<Harness> {
        self.harness_for(self.definition.clone())
    }

    pub fn harness_for(&self, definition: TourDefinition) -> Result<Harness> {
        let store = Rc::new(MemoryFlagStore::new());
        let layout = Rc::new(StaticLayout::from_snapshot(self.layout.clone()));
        let surface = Rc::new(RecordingSurface::new());
        let controller = TourController::new(
            definition,
            self.config.clone(),
            Rc::clone(&store),
            Rc::clone(&layout),
            Rc::clone(&surface),
        )?;
        Ok(Harness {
            store,
            layout,
            surface,
            controller,
        })
    }

    pub fn step_count(&self) -> usize {
        self.definition.step_count()
    }

    pub fn trace(&self, message: impl AsRef<str>) {
        if self.verbose {
            println!("   · {}", message.as_ref());
        }
        log::debug!("{}", message.as_ref());
    }
}

type ScenarioFn = fn(&ScenarioCtx) -> Result<()>;

pub struct Scenario {
    key: &'static str,
    description: &'static str,
    run: ScenarioFn,
}

impl Scenario {
    pub fn run(&self, ctx: &ScenarioCtx) -> ScenarioResult {
        let started = Instant::now();
        let outcome = (self.run)(ctx);
        let duration = started.elapsed();
        match outcome {
            Ok(()) => ScenarioResult::pass(self.key, duration),
            Err(err) => ScenarioResult::fail(self.key, duration, format!("{err:#}")),
        }
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "smoke",
        description: "Start, walk every step with next, complete once",
        run: flow::smoke,
    },
    Scenario {
        key: "missing-target",
        description: "Each step with its target removed renders centered and continues",
        run: flow::missing_target,
    },
    Scenario {
        key: "skip-anywhere",
        description: "Skipping from any step completes and persists the flag",
        run: flow::skip_anywhere,
    },
    Scenario {
        key: "previous-boundary",
        description: "Previous is a no-op on the first step and steps back elsewhere",
        run: flow::previous_boundary,
    },
    Scenario {
        key: "completed-flag",
        description: "A persisted completion blocks start; force start replays",
        run: flow::completed_flag,
    },
    Scenario {
        key: "replay",
        description: "Mounted tour restarts through its replay handle",
        run: flow::replay,
    },
    Scenario {
        key: "clamp-sweep",
        description: "Every step stays inside shrinking, scrolled viewports on all sides",
        run: placement::clamp_sweep,
    },
    Scenario {
        key: "hook-failure",
        description: "A failing advance hook keeps the tour on its step",
        run: hooks::hook_failure,
    },
    Scenario {
        key: "deferred-advance",
        description: "Async advance hooks block navigation until resolved",
        run: hooks::deferred_advance,
    },
];

pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.description))
}

pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.key == key)
}

pub fn all_keys() -> Vec<String> {
    SCENARIOS.iter().map(|s| s.key.to_string()).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub passed: bool,
    pub duration: Duration,
    pub failures: Vec<String>,
}

impl ScenarioResult {
    fn pass(name: &str, duration: Duration) -> Self {
        Self {
            scenario_name: name.to_string(),
            passed: true,
            duration,
            failures: Vec::new(),
        }
    }

    pub fn fail(name: &str, duration: Duration, failure: String) -> Self {
        Self {
            scenario_name: name.to_string(),
            passed: false,
            duration,
            failures: vec![failure],
        }
    }
}
