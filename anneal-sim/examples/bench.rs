use std::time::Instant;

use anneal_sim::mcmc::multispin::REPLICAS;
use anneal_sim::{
    anneal_multispin, anneal_parallel, anneal_quantum, anneal_sequential, graph_energy,
    random_spins, CouplingGraph, Lattice, Schedule,
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

const L: usize = 128;
const N_STEPS: usize = 50;
const N_SWEEPS: usize = 10;
const N_WORKERS: usize = 8;
const N_SLICES: usize = 8;

fn main() {
    let lattice = Lattice::hypercubic(vec![L, L]);
    let n_spins = lattice.n_spins;

    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    let bonds: Vec<f32> = (0..n_spins * lattice.n_directions)
        .map(|_| if rng.gen::<bool>() { 1.0 } else { -1.0 })
        .collect();
    let graph = CouplingGraph::from_lattice(&lattice, &bonds).unwrap();
    let temps = Schedule::geometric(3.0, 0.05, N_STEPS).unwrap();
    let fields = Schedule::linear(3.0, 0.01, N_STEPS).unwrap();

    println!(
        "Lattice: {}x{}  |  Steps: {}  |  Sweeps/step: {}  |  Workers: {}  |  Slices: {}",
        L, L, N_STEPS, N_SWEEPS, N_WORKERS, N_SLICES
    );
    println!("Couplings: bimodal, periodic");
    println!("{}", "-".repeat(70));

    let total_sweeps = (N_STEPS * N_SWEEPS) as f64;
    let report = |name: &str, systems: usize, elapsed: f64, best: f64| {
        let per_sweep = elapsed / total_sweeps * 1000.0;
        let per_flip = elapsed / (total_sweeps * (n_spins * systems) as f64) * 1e9;
        println!(
            "{:<10} {:>8.3} s  |  {:>8.3} ms/sweep  |  {:>6.2} ns/spin  |  E = {:.0}",
            name, elapsed, per_sweep, per_flip, best
        );
    };

    let mut spins = random_spins(1, n_spins, &mut rng);
    let t0 = Instant::now();
    anneal_sequential(&temps, N_SWEEPS, &mut spins, &graph, &mut rng).unwrap();
    report("sequential", 1, t0.elapsed().as_secs_f64(), graph_energy(&spins, &graph).unwrap());

    let mut spins = random_spins(1, n_spins, &mut rng);
    let t0 = Instant::now();
    anneal_parallel(&temps, N_SWEEPS, &mut spins, &graph, N_WORKERS, &mut rng).unwrap();
    report("parallel", 1, t0.elapsed().as_secs_f64(), graph_energy(&spins, &graph).unwrap());

    let mut spins = random_spins(REPLICAS, n_spins, &mut rng);
    let t0 = Instant::now();
    anneal_multispin(&temps, N_SWEEPS, &mut spins, &graph, &mut rng).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    let best = spins
        .chunks_exact(n_spins)
        .map(|r| graph_energy(r, &graph).unwrap())
        .fold(f64::INFINITY, f64::min);
    report("multispin", REPLICAS, elapsed, best);

    let mut spins = random_spins(N_SLICES, n_spins, &mut rng);
    let t0 = Instant::now();
    anneal_quantum(
        &fields, N_SWEEPS, N_SLICES, 0.05, n_spins, &mut spins, &graph, &mut rng,
    )
    .unwrap();
    let elapsed = t0.elapsed().as_secs_f64();
    let best = spins
        .chunks_exact(n_spins)
        .map(|r| graph_energy(r, &graph).unwrap())
        .fold(f64::INFINITY, f64::min);
    report("quantum", N_SLICES, elapsed, best);
}
