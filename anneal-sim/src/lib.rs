//! Monte Carlo engines for annealing Ising models.
//!
//! Four engines share one Metropolis rule over a sparse [`CouplingGraph`]:
//!
//! * [`anneal_sequential`]: randomized single-spin sweeps, one thread.
//! * [`anneal_parallel`]: static index partition over a worker pool, with
//!   unsynchronized neighbor reads across partitions.
//! * [`anneal_multispin`]: 64 replicas bit-packed into one `u64` per spin.
//! * [`anneal_quantum`]: path-integral annealing on a ring of Trotter slices.
//!
//! Every engine mutates the caller's spin buffer in place and takes its random
//! source as an explicit argument.

pub mod config;
pub mod error;
pub mod graph;
pub mod mcmc;
pub mod schedule;
pub mod simulation;
pub mod spins;

pub use config::{AnnealConfig, Engine, QuantumConfig};
pub use error::{AnnealError, AnnealResult};
pub use graph::{CouplingGraph, Lattice};
pub use mcmc::{
    anneal_multispin, anneal_parallel, anneal_parallel_in, anneal_quantum, anneal_sequential,
};
pub use schedule::{Schedule, ScheduleKind};
pub use simulation::{random_spins, run_anneal, AnnealReport};
pub use spins::energy::{graph_energy, ising_energy};
