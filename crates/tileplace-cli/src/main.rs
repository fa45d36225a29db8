mod render;
mod theme;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use serde_json::json;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use theme::Theme;
use tileplace_core::{score, shortest_path, solve, Algorithm, GameRequest, ScoreParams};

#[derive(Parser, Debug)]
#[command(name = "tileplace", version, about = "Optimize tile placement on a puzzle board")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for the best tile placement and print the result as JSON
    Solve(SolveArgs),
    /// Print the baseline score and shortest path of a board
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct SolveArgs {
    /// Board request (JSON)
    input: PathBuf,
    /// Random seed, overrides the request
    #[arg(long)]
    seed: Option<u64>,
    /// Attempts per combination, overrides the request
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Search strategy, overrides the request
    #[arg(long)]
    algorithm: Option<Algorithm>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Draw the optimized board
    #[arg(long)]
    show: bool,
    /// Use the 16-colour palette when drawing
    #[arg(long)]
    basic_colors: bool,
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Board request (JSON)
    input: PathBuf,
    /// Draw the board and its path
    #[arg(long)]
    show: bool,
    #[arg(long)]
    basic_colors: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Command::Solve(args) => run_solve(args),
        Command::Score(args) => run_score(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_request(path: &Path) -> anyhow::Result<GameRequest> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    GameRequest::from_json(&json).with_context(|| format!("failed to parse {}", path.display()))
}

fn theme_for(basic: bool) -> Theme {
    if basic {
        Theme::basic()
    } else {
        Theme::default()
    }
}

/// Apply command-line overrides on top of the request's own settings
fn apply_overrides(request: &mut GameRequest, args: &SolveArgs) {
    let settings = &mut request.solver_settings;
    if let Some(seed) = args.seed {
        settings.random_seed = seed;
    }
    if let Some(n) = args.max_iterations {
        settings.max_iterations = n;
    }
    if let Some(algorithm) = args.algorithm {
        settings.algorithm = algorithm;
    }
}

fn run_solve(args: &SolveArgs) -> anyhow::Result<ExitCode> {
    let mut request = load_request(&args.input)?;
    apply_overrides(&mut request, args);
    let settings = request.solver_settings.clone();

    let response = match solve(&request) {
        Ok(response) => response,
        Err(e) => {
            error!("solve failed: {}", e);
            let body = json!({
                "error": e.to_string(),
                "algorithm_used": settings.algorithm,
                "iterations_used": settings.max_iterations,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.show {
        if let Some(best) = &response.report.best_grid {
            let path = shortest_path(best)
                .map(|r| r.straightened())
                .unwrap_or_default();
            let title = format!(
                "Optimized board (score {:.3}, +{:.3})",
                response.report.best_score, response.report.improvement
            );
            let theme = theme_for(args.basic_colors);
            render::render_grid(&mut io::stderr(), best, &path, &theme, &title)?;
        }
    }

    let body = serde_json::to_string_pretty(&response)?;
    match &args.output {
        Some(path) => {
            fs::write(path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!("result written to {}", path.display());
        }
        None => println!("{}", body),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_score(args: &ScoreArgs) -> anyhow::Result<ExitCode> {
    let request = load_request(&args.input)?;
    let problem = request.to_problem()?;
    let grid = &problem.grid;

    let Some(route) = shortest_path(grid) else {
        println!("No route from start to end");
        return Ok(ExitCode::FAILURE);
    };
    let path = route.straightened();
    let baseline = score(grid, &ScoreParams::default()).unwrap_or(-1.0);

    if args.show {
        let title = format!("Board (score {:.3})", baseline);
        let theme = theme_for(args.basic_colors);
        render::render_grid(&mut io::stderr(), grid, &path, &theme, &title)?;
    } else {
        println!("{}", render::plain_grid(grid, &path));
    }
    println!("score: {:.3}", baseline);
    println!("distance: {}", route.distance);
    println!(
        "tiles: {} normal, {} frozen",
        problem.max_normal, problem.max_frozen
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_overrides_replace_request_settings() {
        let cli = Cli::parse_from([
            "tileplace",
            "solve",
            "board.json",
            "--seed",
            "7",
            "--algorithm",
            "greedy",
        ]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        let mut request = GameRequest::from_json(
            r#"{"board": {"height": 2, "width": 2, "startArea": [{"x": -1, "y": -1}],
                "endArea": [{"x": 2, "y": 2}]}, "towers": 0, "claps": 0,
                "solver_settings": {"max_iterations": 500}}"#,
        )
        .unwrap();
        apply_overrides(&mut request, &args);
        assert_eq!(request.solver_settings.random_seed, 7);
        assert_eq!(request.solver_settings.algorithm, Algorithm::Greedy);
        assert_eq!(request.solver_settings.max_iterations, 500);
    }
}
