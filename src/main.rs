use orbsim::{bench_resolver, bench_tick_curve};
use orbsim::{run_3d, LogRender, Scenario, ScenarioConfig};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "default.yaml")]
    file_name: String,

    /// Run without the viewer for a fixed number of ticks
    #[arg(long)]
    headless: bool,

    /// Tick count for a headless run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Run the resolver benchmarks instead of a simulation
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    let file = File::open(&config_path)?;
    let reader = BufReader::new(file);
    let scenario_cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;

    Ok(scenario_cfg)
}

fn run_headless(mut scenario: Scenario, ticks: u64) {
    let dt = 1.0 / 60.0;
    let mut hooks = LogRender;
    for _ in 0..ticks {
        scenario.advance(dt, &mut hooks);
    }
    info!(
        ticks,
        alive = scenario.system.alive_count(),
        swallowed = scenario.system.swallowed_total,
        escaped = scenario.system.escaped_total,
        "headless run finished"
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    if args.bench {
        bench_resolver();
        bench_tick_curve();
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let scenario = Scenario::build_scenario(scenario_cfg);

    if args.headless {
        run_headless(scenario, args.ticks);
    } else {
        run_3d(scenario);
    }

    Ok(())
}
