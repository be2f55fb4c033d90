use std::ops::Range;
use std::sync::atomic::{AtomicI8, AtomicUsize, Ordering};

use rand_xoshiro::Xoshiro256StarStar;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::{
    check_len, check_schedule, check_spins, check_sweeps, AnnealError, AnnealResult,
};
use crate::graph::CouplingGraph;
use crate::mcmc::metropolis::{local_ediff_with, metropolis_step};

/// Split `0..n` into `parts` contiguous ascending ranges whose lengths differ
/// by at most one. Trailing ranges are empty when `parts > n`.
pub fn partition(n: usize, parts: usize) -> Vec<Range<usize>> {
    let base = n / parts;
    let extra = n % parts;
    let mut start = 0;
    (0..parts)
        .map(|k| {
            let len = base + usize::from(k < extra);
            let range = start..start + len;
            start += len;
            range
        })
        .collect()
}

/// Thread-parallel simulated annealing over a temperature schedule.
///
/// Uses the same Metropolis rule as
/// [`anneal_sequential`](crate::mcmc::anneal_sequential) but with a different
/// sweep: spins are split once into `n_workers` ascending index ranges, and
/// every sweep runs all ranges concurrently on a pool of `n_workers` threads,
/// visiting each range in ascending order. Workers join at the end of every
/// sweep, so no worker crosses a schedule value.
///
/// Spins are shared without locks. A worker reading a neighbor owned by
/// another range may see its value from before or after that range's flip in
/// the current sweep. The result is an approximation of the sequential
/// dynamics, not an equivalent of it.
///
/// Each worker draws from its own stream, taken from `rng` by successive
/// `jump()`s; `rng` is left past all of them.
///
/// A pool is built for this call; use [`anneal_parallel_in`] to reuse one
/// across calls.
pub fn anneal_parallel(
    schedule: &[f32],
    sweeps: usize,
    spins: &mut [i8],
    graph: &CouplingGraph,
    n_workers: usize,
    rng: &mut Xoshiro256StarStar,
) -> AnnealResult<()> {
    if n_workers == 0 {
        return Err(AnnealError::InvalidWorkers(n_workers));
    }
    let pool = ThreadPoolBuilder::new().num_threads(n_workers).build()?;
    anneal_parallel_in(&pool, schedule, sweeps, spins, graph, rng)
}

/// [`anneal_parallel`] on an existing pool, with one worker per pool thread.
#[cfg_attr(feature = "profile", inline(never))]
pub fn anneal_parallel_in(
    pool: &ThreadPool,
    schedule: &[f32],
    sweeps: usize,
    spins: &mut [i8],
    graph: &CouplingGraph,
    rng: &mut Xoshiro256StarStar,
) -> AnnealResult<()> {
    let n_workers = pool.current_num_threads();
    check_sweeps(sweeps)?;
    check_schedule(schedule)?;
    check_len("spins", graph.n_spins(), spins.len())?;
    check_spins(spins)?;

    let n_spins = graph.n_spins();
    debug!(n_spins, n_workers, steps = schedule.len(), sweeps, "parallel anneal");
    if schedule.is_empty() {
        return Ok(());
    }

    let ranges = partition(n_spins, n_workers);
    let mut streams: Vec<Xoshiro256StarStar> = (0..n_workers)
        .map(|_| {
            rng.jump();
            rng.clone()
        })
        .collect();
    rng.jump();

    let mut scratch = vec![0.0f32; n_spins];
    // SAFETY: `AtomicI8` has the same size, alignment and bit validity as
    // `i8`, and `spins` is exclusively borrowed for the whole call.
    let shared: &[AtomicI8] = unsafe { &*(spins as *mut [i8] as *const [AtomicI8]) };

    for &temp in schedule {
        let flips = AtomicUsize::new(0);
        for _ in 0..sweeps {
            pool.scope(|s| {
                let mut rest: &mut [f32] = &mut scratch;
                for (range, stream) in ranges.iter().zip(streams.iter_mut()) {
                    let (own, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                    rest = tail;
                    let range = range.clone();
                    let flips = &flips;
                    s.spawn(move |_| {
                        let n = sweep_range(graph, shared, range, own, stream, temp);
                        flips.fetch_add(n, Ordering::Relaxed);
                    });
                }
            });
        }
        trace!(temp, flips = flips.into_inner(), "schedule step done");
    }

    Ok(())
}

/// One worker's share of a sweep. `scratch[k]` holds the energy difference of
/// spin `range.start + k`.
fn sweep_range(
    graph: &CouplingGraph,
    spins: &[AtomicI8],
    range: Range<usize>,
    scratch: &mut [f32],
    rng: &mut Xoshiro256StarStar,
    temp: f32,
) -> usize {
    let mut flips = 0;
    for (slot, i) in scratch.iter_mut().zip(range) {
        // only this worker writes spin i
        let si = spins[i].load(Ordering::Relaxed);
        *slot = local_ediff_with(graph, i, si, |j| spins[j].load(Ordering::Relaxed));
        if metropolis_step(*slot, temp, rng) {
            spins[i].store(-si, Ordering::Relaxed);
            flips += 1;
        }
    }
    flips
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Lattice;
    use crate::spins::energy::graph_energy;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_partition() {
        assert_eq!(partition(10, 3), vec![0..4, 4..7, 7..10]);
        assert_eq!(partition(4, 4), vec![0..1, 1..2, 2..3, 3..4]);
        assert_eq!(partition(2, 3), vec![0..1, 1..2, 2..2]);
    }

    #[test]
    fn test_empty_schedule_is_noop() {
        let g = CouplingGraph::from_adjacency(vec![vec![(1, 1.0)], vec![(0, 1.0)]]).unwrap();
        let mut spins = vec![-1, 1];
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        anneal_parallel(&[], 4, &mut spins, &g, 2, &mut rng).unwrap();
        assert_eq!(spins, vec![-1, 1]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let g = CouplingGraph::from_adjacency(vec![vec![(0, 1.0)]]).unwrap();
        let mut spins = vec![1];
        let mut rng = Xoshiro256StarStar::seed_from_u64(1);
        assert!(matches!(
            anneal_parallel(&[1.0], 1, &mut spins, &g, 0, &mut rng),
            Err(AnnealError::InvalidWorkers(0))
        ));
    }

    #[test]
    fn test_single_worker_is_deterministic() {
        let lat = Lattice::hypercubic(vec![6, 6]);
        let g = CouplingGraph::from_lattice(&lat, &vec![1.0; 72]).unwrap();
        let run = || {
            let mut spins = vec![1i8; 36];
            spins.iter_mut().step_by(3).for_each(|s| *s = -1);
            let mut rng = Xoshiro256StarStar::seed_from_u64(5);
            anneal_parallel(&[1.5, 0.5], 2, &mut spins, &g, 1, &mut rng).unwrap();
            spins
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_shared_pool_matches_fresh_pools() {
        let lat = Lattice::hypercubic(vec![6, 6]);
        let g = CouplingGraph::from_lattice(&lat, &vec![-1.0; 72]).unwrap();
        let schedule = [2.0f32, 1.0, 0.4];
        let start: Vec<i8> = (0..36).map(|i| if i % 5 == 0 { -1 } else { 1 }).collect();

        let mut fresh = start.clone();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        for temp in schedule {
            anneal_parallel(&[temp], 2, &mut fresh, &g, 1, &mut rng).unwrap();
        }

        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let mut shared = start;
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        for temp in schedule {
            anneal_parallel_in(&pool, &[temp], 2, &mut shared, &g, &mut rng).unwrap();
        }

        assert_eq!(fresh, shared);
    }

    #[test]
    fn test_ferromagnet_orders_with_workers() {
        let lat = Lattice::hypercubic(vec![16, 16]);
        let g = CouplingGraph::from_lattice(&lat, &vec![1.0; 512]).unwrap();
        let mut init = Xoshiro256StarStar::seed_from_u64(9);
        let mut spins: Vec<i8> = (0..256)
            .map(|_| if init.gen::<bool>() { 1 } else { -1 })
            .collect();
        let schedule: Vec<f32> = (0..20).map(|k| 3.0 * 0.8f32.powi(k)).collect();

        let mut rng = Xoshiro256StarStar::seed_from_u64(10);
        anneal_parallel(&schedule, 10, &mut spins, &g, 4, &mut rng).unwrap();

        assert!(spins.iter().all(|&s| s == 1 || s == -1));
        // ground state is -512; a few domain walls are tolerated
        assert!(graph_energy(&spins, &g).unwrap() <= -256.0);
    }
}
