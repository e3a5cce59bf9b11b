//! Headless Battle Runner
//!
//! Runs a scenario file, once or over many seeds in parallel, and prints
//! the results as JSON or text.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use warband::battle::{Battle, BattleOutcome, BattleResult};
use warband::catalog::Catalog;
use warband::combat::BattleContext;
use warband::core::{Result, RuleConfig};
use warband::roster::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Headless Battle Runner - resolve a battle scenario
#[derive(Parser, Debug)]
#[command(name = "battle_runner")]
#[command(about = "Resolve a battle scenario and report the outcome")]
struct Args {
    /// Scenario file (TOML)
    #[arg(long)]
    scenario: PathBuf,

    /// Catalog file (TOML); the built-in standard catalog when omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Rules file (TOML); default rules when omitted
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Random seed for the first trial; trial i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Number of independent trials
    #[arg(long, default_value_t = 1)]
    trials: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print the battle log of the first trial to stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

/// JSON output for one trial
#[derive(Serialize)]
struct TrialResult {
    seed: u64,
    #[serde(flatten)]
    result: BattleResult,
}

/// JSON output for a batch of trials
#[derive(Serialize)]
struct BatchSummary {
    scenario: String,
    trials: u32,
    won: u32,
    lost: u32,
    draw: u32,
    mean_rounds: f64,
    mean_attacker_losses: f64,
    mean_defender_losses: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::standard(),
    };
    let rules = match &args.rules {
        Some(path) => RuleConfig::load(path)?,
        None => RuleConfig::default(),
    };
    let scenario = Scenario::load(&args.scenario, &catalog)?;
    let ctx = BattleContext::new(&catalog, &rules);

    let base_seed = args.seed.unwrap_or_else(rand::random);
    let trials = args.trials.max(1);

    // One scenario copy and one RNG per trial
    let results: Vec<TrialResult> = (0..trials)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i as u64);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut field = scenario.clone();
            let result = Battle::new(ctx).run(&mut field, &mut rng);
            TrialResult { seed, result }
        })
        .collect();

    if args.verbose {
        if let Some(first) = results.first() {
            eprintln!("=== Battle log (seed {}) ===", first.seed);
            for line in first.result.log.lines() {
                eprintln!("  {}", line);
            }
            eprintln!();
        }
    }

    if results.len() == 1 {
        let trial = &results[0];
        match args.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(trial)?),
            Format::Text => print_trial(&catalog, &scenario.name, trial),
        }
    } else {
        let summary = summarize(&scenario.name, &results);
        match args.format {
            Format::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            Format::Text => print_summary(&summary),
        }
    }

    Ok(())
}

fn summarize(name: &str, results: &[TrialResult]) -> BatchSummary {
    let count = |outcome: BattleOutcome| {
        results
            .iter()
            .filter(|trial| trial.result.outcome == outcome)
            .count() as u32
    };
    BatchSummary {
        scenario: name.to_string(),
        trials: results.len() as u32,
        won: count(BattleOutcome::Won),
        lost: count(BattleOutcome::Lost),
        draw: count(BattleOutcome::Draw),
        mean_rounds: mean(results, |result| result.rounds as f64),
        mean_attacker_losses: mean(results, |result| result.attacker.fallen as f64),
        mean_defender_losses: mean(results, |result| result.defender.fallen as f64),
    }
}

fn mean(results: &[TrialResult], value: impl Fn(&BattleResult) -> f64) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|trial| value(&trial.result)).sum::<f64>() / results.len() as f64
}

fn print_trial(catalog: &Catalog, name: &str, trial: &TrialResult) {
    let result = &trial.result;
    println!("Battle Result: {}", name);
    println!("=============");
    println!("Outcome: {:?}", result.outcome);
    println!("Rounds: {}", result.rounds);
    if let Some(assassination) = result.assassination {
        println!("Assassination: {:?}", assassination);
    }
    println!(
        "Attacker: {} survived, {} fell",
        result.attacker.survivors, result.attacker.fallen
    );
    println!(
        "Defender: {} survived, {} fell",
        result.defender.survivors, result.defender.fallen
    );
    if result.spoils.is_empty() {
        println!("Spoils: none.");
    } else {
        let items: Vec<String> = result
            .spoils
            .iter()
            .map(|(item, num)| format!("{} {}", num, catalog.item(item).name))
            .collect();
        println!("Spoils: {}.", items.join(", "));
    }
    println!();
    println!("Seed: {}", trial.seed);
}

fn print_summary(summary: &BatchSummary) {
    println!("Battle Summary: {}", summary.scenario);
    println!("==============");
    println!("Trials: {}", summary.trials);
    println!(
        "Won: {}  Lost: {}  Draw: {}",
        summary.won, summary.lost, summary.draw
    );
    println!("Mean rounds: {:.2}", summary.mean_rounds);
    println!("Mean attacker losses: {:.2}", summary.mean_attacker_losses);
    println!("Mean defender losses: {:.2}", summary.mean_defender_losses);
}
