use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{
    check_len, check_schedule, check_spins, check_sweeps, AnnealError, AnnealResult,
};
use crate::graph::CouplingGraph;
use crate::mcmc::metropolis::{local_ediff_with, metropolis_step};

/// Effective ferromagnetic coupling between neighboring Trotter slices:
/// `J_perp = -P*T/2 * ln(tanh(field / (P*T)))`.
///
/// `ln(tanh x)` is evaluated as `ln(1 - e) - ln(1 + e)` with `e = exp(-2x)`,
/// which keeps precision once `tanh x` is within rounding of 1. For
/// `field > 0` and `temp > 0` the result is finite and strictly positive;
/// values below the smallest normal `f32` are clamped to it.
pub fn trotter_coupling(field: f32, temp: f32, n_slices: usize) -> f32 {
    let pt = n_slices as f64 * temp as f64;
    let e = (-2.0 * field as f64 / pt).exp();
    let ln_tanh = (-e).ln_1p() - e.ln_1p();
    ((-0.5 * pt * ln_tanh) as f32).max(f32::MIN_POSITIVE)
}

/// Slices adjacent to `p` on the periodic ring of `n_slices`.
#[inline]
pub fn ring_neighbors(p: usize, n_slices: usize) -> (usize, usize) {
    ((p + n_slices - 1) % n_slices, (p + 1) % n_slices)
}

/// Energy gained by flipping spin `i` of slice `p`.
///
/// Intra-slice terms read slice `p` only; the imaginary-time terms read the
/// same spin in the two ring-adjacent slices, so slice 0 sees slice
/// `n_slices - 1` and vice versa.
#[inline]
pub fn trotter_ediff(
    graph: &CouplingGraph,
    spins: &[i8],
    n_slices: usize,
    p: usize,
    i: usize,
    j_perp: f32,
) -> f32 {
    let n_spins = graph.n_spins();
    let base = p * n_spins;
    let s = spins[base + i];
    let (left, right) = ring_neighbors(p, n_slices);
    let sf = s as f32;

    local_ediff_with(graph, i, s, |j| spins[base + j])
        + -2.0 * sf * (j_perp * spins[left * n_spins + i] as f32)
        + -2.0 * sf * (j_perp * spins[right * n_spins + i] as f32)
}

/// Path-integral quantum annealing over a transverse-field schedule.
///
/// `spins` holds `n_slices` Trotter slices of `n_spins` spins, slice `p` at
/// `p * n_spins .. (p + 1) * n_spins`; every slice shares `graph`. For each
/// field value the inter-slice coupling is recomputed, then for each of
/// `sweeps` steps the slices are visited in a fresh random order and, within
/// a slice, the spins in a fresh random order. A spin's energy difference is
/// the intra-slice kernel plus `-2 * s * J_perp * (left + right)` from the
/// same spin in the two ring-adjacent slices; the Metropolis decision uses
/// the fixed temperature `temp`.
///
/// With a single slice there is no imaginary-time neighbor and the update
/// reduces to the classical one at `temp`.
#[allow(clippy::too_many_arguments)]
#[cfg_attr(feature = "profile", inline(never))]
pub fn anneal_quantum<R: Rng + ?Sized>(
    schedule: &[f32],
    sweeps: usize,
    n_slices: usize,
    temp: f32,
    n_spins: usize,
    spins: &mut [i8],
    graph: &CouplingGraph,
    rng: &mut R,
) -> AnnealResult<()> {
    check_sweeps(sweeps)?;
    check_schedule(schedule)?;
    if n_slices == 0 {
        return Err(AnnealError::InvalidSlices(n_slices));
    }
    if !(temp.is_finite() && temp > 0.0) {
        return Err(AnnealError::InvalidTemperature(temp));
    }
    check_len("graph spins", n_spins, graph.n_spins())?;
    check_len("slice matrix", n_slices * n_spins, spins.len())?;
    check_spins(spins)?;

    debug!(n_spins, n_slices, temp, steps = schedule.len(), sweeps, "quantum anneal");

    let mut slice_order: Vec<usize> = (0..n_slices).collect();
    let mut spin_order: Vec<usize> = (0..n_spins).collect();

    for &field in schedule {
        let j_perp = if n_slices > 1 {
            trotter_coupling(field, temp, n_slices)
        } else {
            0.0
        };
        let mut flips = 0usize;

        for _ in 0..sweeps {
            slice_order.shuffle(rng);
            for &p in &slice_order {
                spin_order.shuffle(rng);
                for &i in &spin_order {
                    let ediff = trotter_ediff(graph, spins, n_slices, p, i, j_perp);
                    if metropolis_step(ediff, temp, rng) {
                        let k = p * n_spins + i;
                        spins[k] = -spins[k];
                        flips += 1;
                    }
                }
            }
        }
        trace!(field, j_perp, flips, "schedule step done");
    }

    Ok(())
}
