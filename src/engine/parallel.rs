//! Parallel dispatch of the bipartitions of one recursion level.
//!
//! Every bipartition gets a forked strategy and a private scratch pool; the
//! halves run on the rayon pool and the results are folded back in
//! enumeration order, so the outcome is identical to the sequential loop.

use rayon::prelude::*;
use tracing::debug;

use super::TreeEnumerator;
use crate::bits::{BitSet, RankedBitSet};
use crate::constraints::Constraint;
use crate::sets::BipartitionEnumerator;
use crate::space::ScratchPool;
use crate::strategy::Strategy;
use crate::TerraceError;

struct Job<S> {
    left: RankedBitSet,
    right: RankedBitSet,
    strategy: S,
}

pub(super) fn iterate<S: Strategy>(
    enumerator: &mut TreeEnumerator<S>,
    bips: &mut BipartitionEnumerator<'_>,
    active: &BitSet,
    constraints: &[Constraint],
) -> Result<S::Output, TerraceError> {
    let mut acc = enumerator
        .strategy
        .begin_iteration(bips, active, constraints);

    let mut jobs = Vec::new();
    while bips.is_valid() {
        enumerator.strategy.step_iteration(bips);
        let left = bips.current_set().clone();
        bips.flip_sets();
        let right = bips.current_set().clone();
        jobs.push(Job {
            left,
            right,
            strategy: enumerator.strategy.fork(),
        });
        bips.increase();
    }
    debug!(
        jobs = jobs.len(),
        leaves = bips.leaves().count(),
        "dispatching bipartitions"
    );

    let config = enumerator.config.clone();
    let hint = enumerator.pool.hint();
    let results: Vec<Result<(S, S::Output, S::Output), TerraceError>> = jobs
        .into_par_iter()
        .map(|job| {
            let mut worker = TreeEnumerator {
                strategy: job.strategy,
                config: config.clone(),
                pool: ScratchPool::with_hint(hint, false),
            };
            worker.strategy.left_subcall();
            let left = worker.run(&job.left, active, constraints)?;
            worker.strategy.right_subcall();
            let right = worker.run(&job.right, active, constraints)?;
            Ok((worker.strategy, left, right))
        })
        .collect();

    for result in results {
        let (worker, left, right) = result?;
        let (left, right) = enumerator.strategy.absorb(worker, left, right);
        let value = enumerator.strategy.combine(left, right);
        acc = enumerator.strategy.accumulate(acc, value);
    }
    enumerator.strategy.finish_iteration();
    Ok(acc)
}
