//! Calibration demo: fit the G2++ model to a reference cap dataset.
//!
//! Builds the quarterly zero-yield curve, prices the cap strip under
//! Black-76 at the quoted flat volatilities to fix the market targets, runs
//! the multi-round annealing calibration, and reports the surviving
//! parameter sets with the flat volatilities their model prices imply.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use g2cap_core::market_data::ZeroCurve;
use g2cap_models::analytical::{black_cap_implied_vol, black_cap_price};
use g2cap_models::instruments::{atm_swap_rate, standard_cap_schedule, Cap};
use g2cap_models::models::g2pp::cap_price;
use g2cap_optimiser::annealing::SearchBounds;
use g2cap_optimiser::calibration::{calibrate, CalibrationConfig};

/// Quarterly zero yields in percent, first pillar at 0.25y.
const ZERO_YIELDS: [f64; 30] = [
    4.840355907,
    4.745692608,
    4.776552898,
    4.852996706,
    4.944066306,
    5.036961092,
    5.126129493,
    5.209143662,
    5.285021281,
    5.353489664,
    5.414638913,
    5.468747505,
    5.516189651,
    5.557383935,
    5.592763946,
    5.622761184,
    5.647795099,
    5.668267386,
    5.684558899,
    5.697028194,
    5.706011101,
    5.71182094,
    5.714749147,
    5.715066143,
    5.713022348,
    5.70884927,
    5.702760616,
    5.694953404,
    5.685609049,
    5.674894415,
];

const CAP_MATURITIES: [usize; 9] = [1, 2, 3, 4, 5, 7, 10, 15, 20];
const CAP_MARKET_VOLS: [f64; 9] = [
    0.1520, 0.1620, 0.1640, 0.1630, 0.1605, 0.1555, 0.1475, 0.1350, 0.1260,
];

/// Calibrate the G2++ model to the reference cap dataset.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Annealing trials per round.
    #[arg(long, default_value_t = 100)]
    trials: usize,

    /// Iteration budget per trial.
    #[arg(long, default_value_t = 50_000)]
    max_iterations: usize,

    /// Geometric cooling factor within a trial.
    #[arg(long, default_value_t = 0.995)]
    cooling_rate: f64,

    /// Temperature of the first round.
    #[arg(long, default_value_t = 50.0)]
    temperature: f64,

    /// Score a trial must beat to survive the first round.
    #[arg(long, default_value_t = 3.5e-5)]
    score_threshold: f64,

    /// Threshold division factor between rounds.
    #[arg(long, default_value_t = 2.0)]
    score_reduction_ratio: f64,

    /// Seed of the first trial.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Cap notional.
    #[arg(long, default_value_t = 1_000_000.0)]
    notional: f64,
}

/// Build the cap strip: ATM strikes off the curve, Black market prices at
/// the quoted vols, then discount factors attached for model pricing.
fn build_caps(curve: &ZeroCurve, notional: f64) -> Result<Vec<Cap>> {
    let mut caps = Vec::with_capacity(CAP_MATURITIES.len());
    for (&maturity, &vol) in CAP_MATURITIES.iter().zip(&CAP_MARKET_VOLS) {
        let schedule = standard_cap_schedule(maturity);
        let strike = atm_swap_rate(curve, &schedule)
            .with_context(|| format!("ATM strike for the {maturity}y cap"))?;

        let mut cap = Cap::new(maturity, vol, strike, notional, &schedule)?;
        let market_price = black_cap_price(curve, &cap, vol)
            .with_context(|| format!("Black price of the {maturity}y cap"))?;
        cap.set_market_price(market_price)?;
        cap.attach_curve(curve)?;

        tracing::info!(maturity, strike, vol, market_price, "cap target built");
        caps.push(cap);
    }
    Ok(caps)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();

    let curve = ZeroCurve::from_percent_yields(&ZERO_YIELDS, 0.25)
        .context("building the zero curve")?;
    let caps = build_caps(&curve, args.notional)?;

    let bounds = SearchBounds::new([
        (0.15, 0.5),
        (0.003, 0.025),
        (0.08, 0.18),
        (0.008, 0.035),
        (-0.999, -0.9),
    ]);
    let config = CalibrationConfig {
        trials: args.trials,
        max_iterations: args.max_iterations,
        cooling_rate: args.cooling_rate,
        initial_temperature: args.temperature,
        score_threshold: args.score_threshold,
        score_reduction_ratio: args.score_reduction_ratio,
        seed: args.seed,
        ..CalibrationConfig::default()
    };

    let survivors = calibrate(&caps, bounds, &config).context("calibration failed")?;
    if survivors.is_empty() {
        println!("No parameter set reached the score threshold.");
        return Ok(());
    }

    println!("Surviving parameter sets [a, sigma, b, eta, rho] : score");
    for survivor in &survivors {
        let [a, sigma, b, eta, rho] = survivor.params.to_array();
        println!(
            "  [{a:.6}, {sigma:.6}, {b:.6}, {eta:.6}, {rho:.6}] : {:.3e}",
            survivor.score
        );
    }

    let best = survivors
        .iter()
        .min_by(|x, y| x.score.total_cmp(&y.score))
        .expect("non-empty survivor set");
    println!("\nBest fit repricing (maturity, market vol -> fitted vol):");
    for cap in &caps {
        let fitted_price = cap_price(&best.params, cap)?;
        let fitted_vol = black_cap_implied_vol(&curve, cap, fitted_price)
            .with_context(|| format!("implied vol of the {}y cap", cap.maturity_years()))?;
        println!(
            "  {:>2}y: {:.4} -> {:.4}",
            cap.maturity_years(),
            cap.market_vol(),
            fitted_vol
        );
    }

    Ok(())
}
