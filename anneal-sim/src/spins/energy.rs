use crate::error::{check_len, AnnealResult};
use crate::graph::CouplingGraph;

/// Total energy `E = -1/2 sum_{i != j} J_ij s_i s_j - sum_i J_ii s_i` of one
/// configuration under a row-major `n_spins x n_spins` coupling matrix.
///
/// For a symmetric matrix the off-diagonal half-sum is the usual sum over
/// bonds `i < j`.
pub fn ising_energy(spins: &[i8], couplings: &[f32], n_spins: usize) -> AnnealResult<f64> {
    check_len("spins", n_spins, spins.len())?;
    check_len("coupling matrix", n_spins * n_spins, couplings.len())?;

    let mut pair = 0.0f64;
    let mut field = 0.0f64;
    for (i, &si) in spins.iter().enumerate() {
        let row = &couplings[i * n_spins..(i + 1) * n_spins];
        for (j, (&c, &sj)) in row.iter().zip(spins).enumerate() {
            if i == j {
                field += c as f64 * si as f64;
            } else {
                pair += c as f64 * si as f64 * sj as f64;
            }
        }
    }
    Ok(-0.5 * pair - field)
}

/// Same Hamiltonian read from a [`CouplingGraph`].
///
/// Off-diagonal entries are halved since a bond is normally listed from both
/// ends; padding entries contribute nothing.
pub fn graph_energy(spins: &[i8], graph: &CouplingGraph) -> AnnealResult<f64> {
    check_len("spins", graph.n_spins(), spins.len())?;
    let mut total = 0.0f64;
    for (i, &si) in spins.iter().enumerate() {
        let si = si as f64;
        for (j, c) in graph.neighbors(i) {
            total -= if j == i {
                c as f64 * si
            } else {
                0.5 * c as f64 * si * spins[j] as f64
            };
        }
    }
    Ok(total)
}

/// Energy of each configuration in a flat `n_systems x n_spins` buffer, e.g.
/// multispin replicas or Trotter slices.
pub fn system_energies(spins: &[i8], graph: &CouplingGraph) -> AnnealResult<Vec<f64>> {
    let n_spins = graph.n_spins();
    check_len("spins", spins.len().next_multiple_of(n_spins), spins.len())?;
    spins
        .chunks_exact(n_spins)
        .map(|system| graph_energy(system, graph))
        .collect()
}
