//! Bisection search for the critical temperature.
//!
//! Each iteration evaluates the oracle at the midpoint of the current
//! interval and keeps the half that still contains the transition:
//! an ordered midpoint lowers the upper bound, a disordered one raises the
//! lower bound. The search makes exactly one oracle call per iteration and
//! never evaluates the interval ends, so a run of `N` iterations costs `N`
//! RG flows and leaves an interval of width `(high - low) / 2^N`. The search
//! ends early once the midpoint rounds onto a bound, since no temperature
//! strictly inside the interval is left to evaluate.
//!
//! The search assumes the initial interval brackets the transition. Use
//! [`check_bracket`] beforehand if that is in doubt.

mod config;
mod error;
mod event;
mod interval;
mod solution;

pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::{Action, Event};
pub use interval::{IntervalError, SearchInterval, Step};
pub use solution::{Record, Solution, Status};

use tnrg_core::{Phase, PhaseOracle};

use crate::Observer;

/// Narrows `interval` around the critical temperature.
///
/// Observers see every iteration after the interval has moved.
///
/// # Errors
///
/// Returns an error if the config is invalid or the oracle fails. Oracle
/// failures are not retried.
pub fn solve<O, Obs>(
    oracle: &O,
    interval: SearchInterval,
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<O::Output>, Error>
where
    O: PhaseOracle,
    Obs: for<'a> Observer<Event<'a, O::Output>, Action>,
{
    config.validate()?;

    let initial = interval;
    let mut interval = interval;
    let mut records = Vec::new();
    let mut status = Status::Completed;

    for iter in 1..=config.iterations {
        let midpoint = interval.midpoint();
        if !interval.splits_at(midpoint) {
            status = Status::ResolutionLimit;
            break;
        }

        let output = oracle
            .evaluate(midpoint)
            .map_err(|source| Error::oracle(midpoint, source))?;
        let phase = oracle.classify(&output);
        let step = interval.shrink(midpoint, phase);

        let record = Record {
            iter,
            midpoint,
            output,
            phase,
            step,
        };
        let action = observer.observe(&Event {
            record: &record,
            interval,
            budget: config.iterations,
        });
        records.push(record);

        if let Some(Action::StopEarly) = action {
            status = Status::StoppedByObserver;
            break;
        }
    }

    Ok(Solution {
        status,
        initial,
        interval,
        records,
    })
}

/// Runs bisection without observation.
///
/// # Errors
///
/// Returns an error if the config is invalid or the oracle fails.
pub fn solve_unobserved<O: PhaseOracle>(
    oracle: &O,
    interval: SearchInterval,
    config: &Config,
) -> Result<Solution<O::Output>, Error> {
    solve(oracle, interval, config, ())
}

/// Evaluates both ends of `interval` and checks that they straddle the
/// transition, disordered at `low` and ordered at `high`.
///
/// Returns the oracle outputs at `[low, high]`. This costs two extra RG
/// flows, so drivers only run it on request.
///
/// # Errors
///
/// Returns [`Error::NoPhaseChange`] if both ends are in the same phase,
/// [`Error::InvertedPhases`] if the phases are the wrong way round, or
/// [`Error::Oracle`] if an evaluation fails.
pub fn check_bracket<O: PhaseOracle>(
    oracle: &O,
    interval: SearchInterval,
) -> Result<[O::Output; 2], Error> {
    let [low, high] = interval.as_array();

    let low_output = oracle.evaluate(low).map_err(|e| Error::oracle(low, e))?;
    let high_output = oracle.evaluate(high).map_err(|e| Error::oracle(high, e))?;

    match (oracle.classify(&low_output), oracle.classify(&high_output)) {
        (Phase::Disordered, Phase::Ordered) => Ok([low_output, high_output]),
        (Phase::Ordered, Phase::Disordered) => Err(Error::InvertedPhases { low, high }),
        (phase, _) => Err(Error::NoPhaseChange { low, high, phase }),
    }
}
