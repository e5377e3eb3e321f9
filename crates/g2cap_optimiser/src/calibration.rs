//! Multi-round calibration: batches of annealing trials with adaptive
//! bound narrowing and threshold tightening.

use g2cap_models::instruments::Cap;
use g2cap_models::models::G2Parameters;
use tracing::{debug, info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::annealing::{
    simulated_annealing, AnnealingConfig, AnnealingOutcome, SearchBounds, DIMENSIONS,
};
use crate::objective::relative_sse;
use crate::CalibrationError;

/// Hyperparameters of the calibration meta-loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationConfig {
    /// Annealing trials launched per round.
    pub trials: usize,
    /// Iteration budget per trial.
    pub max_iterations: usize,
    /// Geometric cooling factor within a trial.
    pub cooling_rate: f64,
    /// Temperature of the first round's trials. Later rounds reset the
    /// temperature to ten times the round's score threshold.
    pub initial_temperature: f64,
    /// Score a trial must beat to survive the first round. Divided by
    /// `score_reduction_ratio` before every later round.
    pub score_threshold: f64,
    /// Threshold division factor between rounds.
    pub score_reduction_ratio: f64,
    /// Proposal standard deviation as a fraction of each bound width.
    pub jump_fraction: f64,
    /// The loop stops once at most this many survivors remain.
    pub survivor_target: usize,
    /// Seed of the first trial; each subsequent trial, across all rounds,
    /// uses the next consecutive seed.
    pub seed: u64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            trials: 100,
            max_iterations: 50_000,
            cooling_rate: 0.995,
            initial_temperature: 50.0,
            score_threshold: 3.5e-5,
            score_reduction_ratio: 2.0,
            jump_fraction: 1.0 / 20.0,
            survivor_target: 5,
            seed: 0,
        }
    }
}

/// A parameter set that beat the score threshold of its round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Survivor {
    /// The surviving parameter vector.
    pub params: G2Parameters,
    /// Its objective score.
    pub score: f64,
}

/// Minimum, maximum, and population standard deviation of a non-empty
/// sample.
fn sample_statistics(values: &[f64]) -> (f64, f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let mut sq_sum = 0.0;
    for &v in values {
        min = min.min(v);
        max = max.max(v);
        sum += v;
        sq_sum += v * v;
    }
    let n = values.len() as f64;
    let variance = (sq_sum / n - (sum / n) * (sum / n)).max(0.0);
    (min, max, variance.sqrt())
}

/// Run one round of trials with consecutive seeds starting at `base_seed`.
/// Trial `i` warm-starts from `warm_starts[i]` when present.
fn run_round(
    caps: &[Cap],
    bounds: &SearchBounds,
    jump_stds: &[f64; DIMENSIONS],
    annealing: &AnnealingConfig,
    trials: usize,
    base_seed: u64,
    warm_starts: &[[f64; DIMENSIONS]],
) -> Result<Vec<AnnealingOutcome>, CalibrationError> {
    let trial = |i: usize| {
        simulated_annealing(
            |params| relative_sse(caps, params),
            bounds,
            jump_stds,
            annealing,
            base_seed + i as u64,
            warm_starts.get(i).copied(),
        )
    };

    #[cfg(feature = "parallel")]
    {
        (0..trials).into_par_iter().map(trial).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        (0..trials).map(trial).collect()
    }
}

/// Calibrate the G2++ model to the market prices recorded on `caps`.
///
/// The first round launches `trials` independent annealing trials inside
/// `bounds` and keeps the parameter sets scoring below the threshold,
/// canonicalized so the factor relabelling symmetry cannot split one basin
/// into two. While more than `survivor_target` survivors remain, the search
/// bounds shrink around the survivor population (each edge moves to the
/// survivors' min/max padded by two standard deviations, never outwards),
/// the threshold halves, the temperature resets, and a fresh round runs
/// with the survivors as warm starts.
///
/// Returns the final survivors; an empty set means no trial ever beat the
/// first threshold and is a valid outcome, reported at `warn` level.
///
/// # Errors
///
/// Objective failures (unpriced caps, missing discount factors) abort the
/// whole calibration.
pub fn calibrate(
    caps: &[Cap],
    bounds: SearchBounds,
    config: &CalibrationConfig,
) -> Result<Vec<Survivor>, CalibrationError> {
    let mut bounds = bounds;
    let mut jump_stds = bounds.jump_stds(config.jump_fraction);
    let mut threshold = config.score_threshold;
    let mut annealing = AnnealingConfig {
        max_iterations: config.max_iterations,
        initial_temperature: config.initial_temperature,
        cooling_rate: config.cooling_rate,
        termination_score: threshold,
    };
    let mut next_seed = config.seed;

    info!(
        trials = config.trials,
        threshold,
        temperature = annealing.initial_temperature,
        "starting calibration"
    );
    let outcomes = run_round(
        caps,
        &bounds,
        &jump_stds,
        &annealing,
        config.trials,
        next_seed,
        &[],
    )?;
    next_seed += config.trials as u64;

    let mut survivors: Vec<Survivor> = Vec::new();
    for (i, outcome) in outcomes.iter().enumerate() {
        if outcome.score < threshold {
            let params = outcome.params.canonical();
            info!(
                trial = i + 1,
                score = outcome.score,
                iterations = outcome.iterations,
                params = ?params.to_array(),
                "trial kept"
            );
            survivors.push(Survivor {
                params,
                score: outcome.score,
            });
        }
    }
    info!(survivors = survivors.len(), "round complete");

    while survivors.len() > config.survivor_target {
        for dim in 0..DIMENSIONS {
            let values: Vec<f64> = survivors
                .iter()
                .map(|s| s.params.to_array()[dim])
                .collect();
            let (min, max, std) = sample_statistics(&values);
            bounds.narrow(dim, min - 2.0 * std, max + 2.0 * std);
            debug!(dim, min, max, std, interval = ?bounds.intervals()[dim], "narrowed");
        }
        jump_stds = bounds.jump_stds(config.jump_fraction);
        annealing.initial_temperature = threshold * 10.0;
        threshold /= config.score_reduction_ratio;
        annealing.termination_score = threshold;
        info!(threshold, bounds = ?bounds.intervals(), "starting round");

        let warm_starts: Vec<[f64; DIMENSIONS]> =
            survivors.iter().map(|s| s.params.to_array()).collect();
        let outcomes = run_round(
            caps,
            &bounds,
            &jump_stds,
            &annealing,
            config.trials,
            next_seed,
            &warm_starts,
        )?;
        next_seed += config.trials as u64;

        let mut next_survivors = Vec::new();
        for (i, outcome) in outcomes.iter().enumerate() {
            if outcome.score < threshold {
                info!(
                    trial = i + 1,
                    score = outcome.score,
                    iterations = outcome.iterations,
                    warm_started = i < warm_starts.len(),
                    "trial kept"
                );
                next_survivors.push(Survivor {
                    params: outcome.params,
                    score: outcome.score,
                });
            }
        }
        survivors = next_survivors;
        info!(survivors = survivors.len(), "round complete");
    }

    if survivors.is_empty() {
        warn!("no trial reached the score threshold");
    }
    for survivor in &mut survivors {
        survivor.params = survivor.params.canonical();
    }
    Ok(survivors)
}
