//! Multispin coding: 64 independent replicas packed into one `u64` per spin.
//!
//! Bit `k` of word `i` is spin `i` of replica `k`, with bit 0 meaning +1 and
//! bit 1 meaning -1. A spin update evaluates all 64 replicas together: the
//! XOR of two words marks, per replica, whether a bond is anti-aligned, and a
//! single XOR with the flip mask applies every accepted move at once.

use rand::Rng;
use tracing::{debug, trace};

use crate::error::{check_len, check_schedule, check_spins, check_sweeps, AnnealResult};
use crate::graph::CouplingGraph;

/// Replicas carried per word.
pub const REPLICAS: usize = u64::BITS as usize;

/// State of replica `k` in `word`: `true` means spin -1.
#[inline]
pub fn bit(word: u64, k: usize) -> bool {
    (word >> k) & 1 == 1
}

/// `word` with bit `k` set to `value`.
#[inline]
pub fn with_bit(word: u64, k: usize, value: bool) -> u64 {
    (word & !(1u64 << k)) | (u64::from(value) << k)
}

#[inline]
fn spin_to_bit(s: i8) -> bool {
    s < 0
}

#[inline]
fn bit_to_spin(b: bool) -> i8 {
    if b {
        -1
    } else {
        1
    }
}

/// Pack a replica-major `REPLICAS x n_spins` spin matrix into one word per spin.
pub fn pack_replicas(replicas: &[i8], n_spins: usize) -> Vec<u64> {
    let mut words = vec![0u64; n_spins];
    if n_spins == 0 {
        return words;
    }
    for (k, row) in replicas.chunks_exact(n_spins).take(REPLICAS).enumerate() {
        for (w, &s) in words.iter_mut().zip(row) {
            *w = with_bit(*w, k, spin_to_bit(s));
        }
    }
    words
}

/// Write packed words back into a replica-major `REPLICAS x words.len()` matrix.
pub fn unpack_replicas(words: &[u64], replicas: &mut [i8]) {
    let n_spins = words.len();
    if n_spins == 0 {
        return;
    }
    for (k, row) in replicas.chunks_exact_mut(n_spins).take(REPLICAS).enumerate() {
        for (s, &w) in row.iter_mut().zip(words) {
            *s = bit_to_spin(bit(w, k));
        }
    }
}

/// Per-replica energy gain of flipping spin `i`, accumulated into `ediff`.
#[inline]
fn accumulate_ediff(graph: &CouplingGraph, words: &[u64], i: usize, ediff: &mut [f32; REPLICAS]) {
    let own = words[i];
    for (j, c) in graph.neighbors(i) {
        // self entry: the spin's own sign; otherwise set where the bond is anti-aligned
        let anti = if j == i { own } else { own ^ words[j] };
        let gain = 2.0 * c;
        for (k, e) in ediff.iter_mut().enumerate() {
            *e += if bit(anti, k) { gain } else { -gain };
        }
    }
}

/// Simulated annealing of 64 replicas at once.
///
/// `replicas` is a replica-major `64 x n_spins` matrix of +1/-1 values,
/// packed once on entry and unpacked once on exit. Spins are updated in
/// ascending index order; each update draws 64 fresh uniforms, one per
/// replica, and replica `k` flips iff `exp(ediff[k] / T) > u[k]`.
///
/// Each replica follows exactly the dynamics of the single-replica rule fed
/// with its own column of draws.
#[cfg_attr(feature = "profile", inline(never))]
pub fn anneal_multispin<R: Rng + ?Sized>(
    schedule: &[f32],
    sweeps: usize,
    replicas: &mut [i8],
    graph: &CouplingGraph,
    rng: &mut R,
) -> AnnealResult<()> {
    check_sweeps(sweeps)?;
    check_schedule(schedule)?;
    let n_spins = graph.n_spins();
    check_len("replica matrix", REPLICAS * n_spins, replicas.len())?;
    check_spins(replicas)?;

    debug!(n_spins, replicas = REPLICAS, steps = schedule.len(), sweeps, "multispin anneal");

    let mut words = pack_replicas(replicas, n_spins);
    let mut ediff = [0.0f32; REPLICAS];
    let mut draws = [0.0f32; REPLICAS];

    for &temp in schedule {
        let mut flips = 0u64;
        for _ in 0..sweeps {
            for i in 0..n_spins {
                ediff.fill(0.0);
                accumulate_ediff(graph, &words, i, &mut ediff);
                draws.iter_mut().for_each(|u| *u = rng.gen());

                let mask = ediff
                    .iter()
                    .zip(&draws)
                    .enumerate()
                    .fold(0u64, |mask, (k, (&e, &u))| {
                        with_bit(mask, k, (e / temp).exp() > u)
                    });
                words[i] ^= mask;
                flips += u64::from(mask.count_ones());
            }
        }
        trace!(temp, flips, "schedule step done");
    }

    unpack_replicas(&words, replicas);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnealError;
    use crate::mcmc::metropolis::{accepts, local_ediff};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    #[test]
    fn test_bit_helpers() {
        let w = with_bit(0, 5, true);
        assert_eq!(w, 1 << 5);
        assert!(bit(w, 5));
        assert!(!bit(w, 4));
        assert_eq!(with_bit(w, 5, false), 0);
        let top = with_bit(0, 63, true);
        assert_eq!(top, 1 << 63);
        assert!(bit(top, 63));
        assert_eq!(with_bit(u64::MAX, 0, true), u64::MAX);
    }

    #[test]
    fn test_pack_unpack() {
        let n_spins = 3;
        let mut m = vec![1i8; REPLICAS * n_spins];
        // replica 2 has spin 1 down, replica 63 has spin 0 down
        m[2 * n_spins + 1] = -1;
        m[63 * n_spins] = -1;
        let words = pack_replicas(&m, n_spins);
        assert_eq!(words, vec![1 << 63, 1 << 2, 0]);

        let mut out = vec![0i8; REPLICAS * n_spins];
        unpack_replicas(&words, &mut out);
        assert_eq!(out, m);
    }

    #[test]
    fn test_empty_schedule_is_noop() {
        let g = CouplingGraph::from_adjacency(vec![vec![(1, 1.0)], vec![(0, 1.0)]]).unwrap();
        let mut m: Vec<i8> = (0..REPLICAS * 2).map(|x| if x % 3 == 0 { -1 } else { 1 }).collect();
        let before = m.clone();
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        anneal_multispin(&[], 2, &mut m, &g, &mut rng).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let g = CouplingGraph::from_adjacency(vec![vec![(1, 1.0)], vec![(0, 1.0)]]).unwrap();
        let mut m = vec![1i8; 2 * 63];
        let mut rng = Xoshiro256StarStar::seed_from_u64(0);
        assert!(matches!(
            anneal_multispin(&[1.0], 1, &mut m, &g, &mut rng),
            Err(AnnealError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_matches_per_replica_rule() {
        // frustrated ring of 5 with biases, couplings of mixed sign
        let n = 5;
        let g = CouplingGraph::from_adjacency(
            (0..n)
                .map(|i| {
                    let c = if i % 2 == 0 { 1.0 } else { -0.7 };
                    vec![((i + 1) % n, c), ((i + n - 1) % n, 0.4), (i, 0.3 * i as f32 - 0.5)]
                })
                .collect(),
        )
        .unwrap();
        let schedule = [2.0f32, 1.0, 0.4, 0.1];
        let sweeps = 3;
        let start: Vec<i8> = vec![1, -1, -1, 1, -1];

        let mut packed: Vec<i8> = start.repeat(REPLICAS);
        let mut rng = Xoshiro256StarStar::seed_from_u64(2024);
        anneal_multispin(&schedule, sweeps, &mut packed, &g, &mut rng).unwrap();

        // Replay the same draw stream, replica by replica, with the scalar kernel.
        let mut draws = Vec::new();
        let mut replay = Xoshiro256StarStar::seed_from_u64(2024);
        for _ in 0..schedule.len() * sweeps * n {
            let batch: Vec<f32> = (0..REPLICAS).map(|_| replay.gen()).collect();
            draws.push(batch);
        }
        for k in 0..REPLICAS {
            let mut spins = start.clone();
            let mut step = 0;
            for &temp in &schedule {
                for _ in 0..sweeps {
                    for i in 0..n {
                        let ediff = local_ediff(&g, &spins, i);
                        if accepts(ediff, temp, draws[step][k]) {
                            spins[i] = -spins[i];
                        }
                        step += 1;
                    }
                }
            }
            assert_eq!(&packed[k * n..(k + 1) * n], &spins[..], "replica {k}");
        }
    }
}
