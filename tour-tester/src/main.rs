mod reports;
mod scenario;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use scenario::{ScenarioCtx, ScenarioResult, all_keys, get_scenario, list_scenarios};
use tour_engine::{LayoutSnapshot, TourConfig, TourDefinition};
use util::{read_or_bundled, split_csv};

const BUNDLED_DEFINITION: &str = include_str!("../fixtures/candidate_dashboard.json");
const BUNDLED_LAYOUT: &str = include_str!("../fixtures/candidate_layout.json");
const BUNDLED_CONFIG: &str = include_str!("../fixtures/tour_config.json");

#[derive(Debug, Parser)]
#[command(name = "tour-tester", version)]
#[command(about = "Headless QA for guided tour definitions against a recorded page layout")]
struct Args {
    /// Tour definition JSON (defaults to the bundled candidate dashboard tour)
    #[arg(long)]
    definition: Option<PathBuf>,

    /// Layout snapshot JSON: viewport plus target rectangles
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Tour configuration JSON; missing keys use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let ctx = load_context(&args)?;
    log::info!(
        "loaded tour `{}` with {} steps",
        ctx.definition.id,
        ctx.step_count()
    );
    let results = run_scenarios(&ctx, &expand_scenarios(&args.scenarios));

    write_reports(&args, &ctx.definition.id, &results, start_time.elapsed())?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🧭 Tour Scenario Tester".bright_cyan().bold());
    println!("{}", "=======================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in all_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

fn load_context(args: &Args) -> Result<ScenarioCtx> {
    let definition_json = read_or_bundled(args.definition.as_deref(), BUNDLED_DEFINITION)?;
    let layout_json = read_or_bundled(args.layout.as_deref(), BUNDLED_LAYOUT)?;
    let config_json = read_or_bundled(args.config.as_deref(), BUNDLED_CONFIG)?;

    let definition =
        TourDefinition::from_json(&definition_json).context("invalid tour definition")?;
    let layout: LayoutSnapshot =
        serde_json::from_str(&layout_json).context("invalid layout snapshot")?;
    let config = TourConfig::from_json(&config_json).context("invalid tour configuration")?;

    Ok(ScenarioCtx {
        definition,
        layout,
        config,
        verbose: args.verbose,
    })
}

fn run_scenarios(ctx: &ScenarioCtx, scenarios: &[String]) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    for name in scenarios {
        let Some(scenario) = get_scenario(name) else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            results.push(ScenarioResult::fail(
                name,
                Duration::ZERO,
                format!("unknown scenario `{name}`"),
            ));
            continue;
        };
        let result = scenario.run(ctx);
        if result.passed {
            println!("✅ {} - {:?}", name.green(), result.duration);
        } else {
            eprintln!("❌ {} - {:?}", name.red(), result.duration);
            for failure in &result.failures {
                eprintln!("   {failure}");
            }
        }
        results.push(result);
    }
    results
}

fn write_reports(
    args: &Args,
    tour_id: &str,
    results: &[ScenarioResult],
    duration: Duration,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, results)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, tour_id, results)?,
        _ => {
            reports::generate_console_report(&mut output_target, tour_id, results, duration)?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
