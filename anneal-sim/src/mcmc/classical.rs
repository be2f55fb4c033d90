use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{check_len, check_schedule, check_spins, check_sweeps, AnnealResult};
use crate::graph::CouplingGraph;
use crate::mcmc::metropolis::{local_ediff, metropolis_step};

/// Sequential simulated annealing over a temperature schedule.
///
/// For each temperature, `sweeps` sweeps are run; every sweep visits each
/// spin exactly once in a freshly shuffled order and every decision sees the
/// latest values, including flips made earlier in the same sweep.
///
/// `spins` is mutated in place. An empty schedule leaves it untouched.
#[cfg_attr(feature = "profile", inline(never))]
pub fn anneal_sequential<R: Rng + ?Sized>(
    schedule: &[f32],
    sweeps: usize,
    spins: &mut [i8],
    graph: &CouplingGraph,
    rng: &mut R,
) -> AnnealResult<()> {
    check_sweeps(sweeps)?;
    check_schedule(schedule)?;
    check_len("spins", graph.n_spins(), spins.len())?;
    check_spins(spins)?;

    let n_spins = graph.n_spins();
    debug!(n_spins, steps = schedule.len(), sweeps, "sequential anneal");

    let mut order: Vec<usize> = (0..n_spins).collect();
    for &temp in schedule {
        let mut flips = 0usize;
        for _ in 0..sweeps {
            order.shuffle(rng);
            for &i in &order {
                let ediff = local_ediff(graph, spins, i);
                if metropolis_step(ediff, temp, rng) {
                    spins[i] = -spins[i];
                    flips += 1;
                }
            }
        }
        trace!(temp, flips, "schedule step done");
    }

    Ok(())
}
