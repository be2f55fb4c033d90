use rand::Rng;

use crate::graph::CouplingGraph;

/// Energy gained by flipping spin `i`, read against `spins`.
///
/// A self entry contributes `-2 * s_i * J` (linear bias), any other entry
/// `-2 * s_i * J * s_j`. Positive means the flip lowers the energy of
/// `H = -sum J s_i s_j - sum h s_i`.
#[inline]
pub fn local_ediff(graph: &CouplingGraph, spins: &[i8], i: usize) -> f32 {
    local_ediff_with(graph, i, spins[i], |j| spins[j])
}

/// [`local_ediff`] with neighbor values supplied by `spin_at`.
///
/// Lets the parallel engine read shared spins and the quantum engine read one
/// Trotter slice without copying.
#[inline]
pub fn local_ediff_with(
    graph: &CouplingGraph,
    i: usize,
    si: i8,
    mut spin_at: impl FnMut(usize) -> i8,
) -> f32 {
    let s = si as f32;
    let mut ediff = 0.0f32;
    for (j, c) in graph.neighbors(i) {
        ediff += if j == i {
            -2.0 * s * c
        } else {
            -2.0 * s * c * spin_at(j) as f32
        };
    }
    ediff
}

/// Pure Metropolis decision for a given uniform draw `u` in `[0, 1)`.
///
/// `ediff >= 0` is accepted before the exponential is evaluated.
#[inline]
pub fn accepts(ediff: f32, temp: f32, u: f32) -> bool {
    ediff >= 0.0 || u < (ediff / temp).exp()
}

/// Metropolis decision, drawing from `rng` only when the move costs energy.
#[inline]
pub fn metropolis_step<R: Rng + ?Sized>(ediff: f32, temp: f32, rng: &mut R) -> bool {
    if ediff >= 0.0 {
        return true;
    }
    rng.gen::<f32>() < (ediff / temp).exp()
}
