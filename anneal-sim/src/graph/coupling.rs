use crate::error::{AnnealError, AnnealResult};
use crate::graph::Lattice;

/// Sparse coupling graph with a fixed number of entries per spin.
///
/// Spin `i` owns entries `i * degree .. (i + 1) * degree` of the flat
/// `neighbors` / `couplings` arrays. An entry whose neighbor is `i` itself is
/// a linear bias on spin `i`. Lists shorter than `degree` are padded with
/// `(i, 0.0)`, which contributes nothing to any energy difference.
///
/// Lists are independent per spin: `J[i][j]` and `J[j][i]` are separate
/// entries and the engines never assume they agree.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingGraph {
    n_spins: usize,
    degree: usize,
    neighbors: Vec<usize>,
    couplings: Vec<f32>,
}

impl CouplingGraph {
    /// Build from flat per-spin lists of length `n_spins * degree`.
    pub fn new(
        n_spins: usize,
        degree: usize,
        neighbors: Vec<usize>,
        couplings: Vec<f32>,
    ) -> AnnealResult<Self> {
        if n_spins == 0 {
            return Err(AnnealError::EmptyGraph);
        }
        crate::error::check_len("neighbor table", n_spins * degree, neighbors.len())?;
        crate::error::check_len("coupling table", n_spins * degree, couplings.len())?;

        for (slot, &j) in neighbors.iter().enumerate() {
            if j >= n_spins {
                return Err(AnnealError::NeighborOutOfRange {
                    spin: slot / degree,
                    neighbor: j,
                    n_spins,
                });
            }
        }

        Ok(Self {
            n_spins,
            degree,
            neighbors,
            couplings,
        })
    }

    /// Build from ragged adjacency lists, padding every list to the longest.
    pub fn from_adjacency(lists: Vec<Vec<(usize, f32)>>) -> AnnealResult<Self> {
        let n_spins = lists.len();
        let degree = lists.iter().map(Vec::len).max().unwrap_or(0);

        let mut neighbors = Vec::with_capacity(n_spins * degree);
        let mut couplings = Vec::with_capacity(n_spins * degree);
        for (i, list) in lists.into_iter().enumerate() {
            let pad = degree - list.len();
            for (j, c) in list {
                neighbors.push(j);
                couplings.push(c);
            }
            neighbors.extend(std::iter::repeat(i).take(pad));
            couplings.extend(std::iter::repeat(0.0).take(pad));
        }

        Self::new(n_spins, degree, neighbors, couplings)
    }

    /// Build from a row-major `n_spins x n_spins` coupling matrix.
    ///
    /// Row `i` lists every nonzero `J[i][j]`; the diagonal becomes the bias.
    /// The matrix is expected to be symmetric.
    pub fn from_dense(matrix: &[f32], n_spins: usize) -> AnnealResult<Self> {
        crate::error::check_len("coupling matrix", n_spins * n_spins, matrix.len())?;
        let lists = matrix
            .chunks_exact(n_spins.max(1))
            .take(n_spins)
            .map(|row| {
                row.iter()
                    .enumerate()
                    .filter(|(_, &c)| c != 0.0)
                    .map(|(j, &c)| (j, c))
                    .collect()
            })
            .collect();
        Self::from_adjacency(lists)
    }

    /// Lay out nearest-neighbor couplings on a periodic lattice.
    ///
    /// `forward_couplings[i * n_directions + d]` is the bond from site `i` to
    /// its forward neighbor along direction `d`; each bond is listed from both
    /// ends. Bonds that wrap onto their own site (extent 1) are constant
    /// energy and are dropped.
    pub fn from_lattice(lattice: &Lattice, forward_couplings: &[f32]) -> AnnealResult<Self> {
        let n_dirs = lattice.n_directions;
        crate::error::check_len(
            "lattice couplings",
            lattice.n_spins * n_dirs,
            forward_couplings.len(),
        )?;

        let mut lists: Vec<Vec<(usize, f32)>> = vec![Vec::with_capacity(2 * n_dirs); lattice.n_spins];
        for i in 0..lattice.n_spins {
            for d in 0..n_dirs {
                let j = lattice.forward(i, d);
                if j == i {
                    continue;
                }
                let c = forward_couplings[i * n_dirs + d];
                lists[i].push((j, c));
                lists[j].push((i, c));
            }
        }

        Self::from_adjacency(lists)
    }

    pub fn n_spins(&self) -> usize {
        self.n_spins
    }

    /// Entries per spin, padding included.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// `(neighbor, coupling)` pairs of spin `i`, in stored order.
    #[inline]
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let span = i * self.degree..(i + 1) * self.degree;
        self.neighbors[span.clone()]
            .iter()
            .copied()
            .zip(self.couplings[span].iter().copied())
    }
}
