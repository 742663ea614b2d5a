use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};
use xytheta::{
    lattice::{ContinuousState, Obstacle, PrimitiveDefinitions, XythetaEnvironment},
    search::{Verbosity, XythetaPlanner},
    Config, XythetaError,
};

#[derive(Parser)]
#[command(version)]
/// Plan a path for a differential drive robot on an (x, y, heading) lattice.
struct Cli {
    #[arg(
        help = "The start pose as x_mm,y_mm,theta_deg",
        value_parser = parse_pose,
        allow_hyphen_values = true
    )]
    start: ContinuousState,
    #[arg(
        help = "The goal pose as x_mm,y_mm,theta_deg",
        value_parser = parse_pose,
        allow_hyphen_values = true
    )]
    goal: ContinuousState,
    #[arg(
        help = "The maximum number of expansions before giving up",
        short = 'n',
        long = "max-expansions",
        id = "MAX_EXPANSIONS",
        default_value_t = 100_000
    )]
    max_expansions: u64,
    #[arg(
        help = "TOML file with [lattice] and [planner] tables",
        long = "config",
        id = "CONFIG"
    )]
    config: Option<PathBuf>,
    #[arg(
        help = "JSON file with motion primitive definitions, the standard \
        set is used if not given",
        short = 'p',
        long = "primitives",
        id = "PRIMITIVES"
    )]
    primitives: Option<PathBuf>,
    #[arg(
        help = "JSON file with a list of obstacles",
        long = "obstacles",
        id = "OBSTACLES"
    )]
    obstacles: Option<PathBuf>,
    #[arg(
        help = "Write the plan as JSON to this file",
        short = 'o',
        long = "output",
        id = "OUTPUT"
    )]
    output: Option<PathBuf>,
    #[arg(
        help = "Rotating in place on the goal cell costs nothing",
        long = "free-turn-at-goal"
    )]
    free_turn_at_goal: bool,
    #[arg(
        value_enum,
        help = "The verbosity level",
        short = 'v',
        long = "verbosity",
        id = "VERBOSITY",
        default_value_t = Verbosity::Normal
    )]
    verbosity: Verbosity,
    #[arg(help = "Whether to use coloured output", short = 'c', long = "colour")]
    colour: bool,
}

fn parse_pose(text: &str) -> Result<ContinuousState, String> {
    let values = text
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| format!("invalid pose '{}': {}", text, e))?;
    match values.as_slice() {
        &[x_mm, y_mm, theta_deg] => Ok(ContinuousState::new(x_mm, y_mm, theta_deg.to_radians())),
        _ => Err(format!(
            "invalid pose '{}': expected three comma separated numbers",
            text
        )),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: tracing::Level = cli.verbosity.into();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(cli.colour)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether a plan was found.
fn run(cli: Cli) -> Result<bool, XythetaError> {
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    if cli.free_turn_at_goal {
        config.planner = config.planner.with_free_turn_in_place_at_goal(true);
    }

    let definitions = match &cli.primitives {
        Some(path) => PrimitiveDefinitions::from_path(path)?,
        None => PrimitiveDefinitions::standard(config.lattice.resolution_mm),
    };
    let mut environment = XythetaEnvironment::with_primitives(config.lattice, &definitions)?;
    if let Some(path) = &cli.obstacles {
        let obstacles = Obstacle::list_from_path(path)?;
        info!(num_obstacles = obstacles.len(), "loaded obstacles");
        environment.add_obstacles(obstacles)?;
    }

    let mut planner = XythetaPlanner::with_config(environment, config.planner);
    if !planner.set_start(&cli.start) {
        println!("Start {} is in collision", cli.start);
        return Ok(false);
    }
    if !planner.set_goal(&cli.goal) {
        println!("Goal {} is in collision", cli.goal);
        return Ok(false);
    }

    let result = planner.replan_with_result(cli.max_expansions);
    if !result.is_success() {
        println!("No plan found: {}", result);
        return Ok(false);
    }

    let plan = planner.plan();
    println!("Plan found:");
    println!("{}", plan);
    println!("Plan length: {}", plan.len());
    println!("Plan cost: {:.3}", planner.final_cost());
    println!("Expansions: {}", planner.expansions());

    if let Some(path) = &cli.output {
        let json = serde_json::to_string_pretty(plan)?;
        std::fs::write(path, json).map_err(|e| XythetaError::io(path, e))?;
        info!(path = %path.display(), "wrote plan");
    }
    Ok(true)
}
