use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;
use rayon::ThreadPoolBuilder;
use serde::Serialize;
use tracing::info;
use validator::Validate;

use crate::config::{AnnealConfig, Engine};
use crate::error::{check_len, AnnealError, AnnealResult};
use crate::graph::CouplingGraph;
use crate::mcmc;
use crate::spins::energy::system_energies;

/// Outcome of [`run_anneal`].
#[derive(Debug, Clone, Serialize)]
pub struct AnnealReport {
    pub engine: Engine,
    pub n_spins: usize,
    /// Schedule values consumed.
    pub steps: usize,
    pub sweeps: usize,
    /// Final energy of every evolved configuration (replica or Trotter slice).
    pub energies: Vec<f64>,
    pub best_energy: f64,
    /// Configuration holding `best_energy`.
    pub best_system: usize,
}

/// Uniformly random +1/-1 spins for `n_systems` configurations of `n_spins`.
pub fn random_spins<R: Rng + ?Sized>(n_systems: usize, n_spins: usize, rng: &mut R) -> Vec<i8> {
    (0..n_systems * n_spins)
        .map(|_| if rng.gen::<f32>() < 0.5 { -1 } else { 1 })
        .collect()
}

/// Run one configured anneal on `spins`, a flat buffer of
/// `config.n_systems() * graph.n_spins()` entries.
///
/// The engine is driven one schedule value at a time so that `on_step` is
/// called after each (useful for progress bars). The parallel engine shares
/// one thread pool across all values. Multispin packs and unpacks its
/// replicas once per value rather than once per run.
///
/// Energies in the report use `H = -sum J s_i s_j - sum h s_i` on every
/// configuration; for the quantum engine that is the classical energy of
/// each Trotter slice.
pub fn run_anneal(
    config: &AnnealConfig,
    graph: &CouplingGraph,
    spins: &mut [i8],
    rng: &mut Xoshiro256StarStar,
    on_step: &(dyn Fn() + Sync),
) -> AnnealResult<AnnealReport> {
    config
        .validate()
        .map_err(|e| AnnealError::Config(format!("{e}")))?;

    let n_spins = graph.n_spins();
    check_len("spins", config.n_systems() * n_spins, spins.len())?;
    let schedule = config.schedule.values()?;

    let pool = match config.engine {
        Engine::Parallel => {
            let n_workers = config.n_workers.unwrap_or_else(rayon::current_num_threads);
            Some(ThreadPoolBuilder::new().num_threads(n_workers).build()?)
        }
        _ => None,
    };

    info!(
        engine = ?config.engine,
        n_spins,
        steps = schedule.len(),
        sweeps = config.sweeps,
        "anneal start"
    );

    for value in &schedule {
        let step = std::slice::from_ref(value);
        match (config.engine, pool.as_ref()) {
            (Engine::Sequential, _) => {
                mcmc::anneal_sequential(step, config.sweeps, spins, graph, rng)?
            }
            (Engine::Parallel, Some(pool)) => {
                mcmc::anneal_parallel_in(pool, step, config.sweeps, spins, graph, rng)?
            }
            (Engine::Parallel, None) => unreachable!("pool is built for the parallel engine"),
            (Engine::Multispin, _) => {
                mcmc::anneal_multispin(step, config.sweeps, spins, graph, rng)?
            }
            (Engine::Quantum, _) => {
                let q = config.quantum.ok_or_else(|| {
                    AnnealError::Config("engine 'quantum' requires quantum settings".to_string())
                })?;
                mcmc::anneal_quantum(
                    step,
                    config.sweeps,
                    q.n_slices,
                    q.temperature,
                    n_spins,
                    spins,
                    graph,
                    rng,
                )?
            }
        }
        on_step();
    }

    let energies = system_energies(spins, graph)?;
    let (best_system, best_energy) = energies
        .iter()
        .copied()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .unwrap_or((0, 0.0));

    info!(best_energy, best_system, "anneal done");

    Ok(AnnealReport {
        engine: config.engine,
        n_spins,
        steps: schedule.len(),
        sweeps: config.sweeps,
        energies,
        best_energy,
        best_system,
    })
}
