use crate::error::{check_len, AnnealResult};

/// Hypercubic bond directions: one unit vector per dimension.
///
/// For `n_dims = 3` this returns `[[1,0,0], [0,1,0], [0,0,1]]`.
pub fn hypercubic(n_dims: usize) -> Vec<Vec<isize>> {
    (0..n_dims)
        .map(|d| (0..n_dims).map(|k| isize::from(k == d)).collect())
        .collect()
}

/// Periodic Bravais lattice used to lay out nearest-neighbor problems.
///
/// Sites are numbered in row-major order. Only forward bonds are tabulated;
/// [`CouplingGraph::from_lattice`](crate::graph::CouplingGraph::from_lattice)
/// lists each bond from both ends.
#[derive(Debug, Clone)]
pub struct Lattice {
    /// Extent along each dimension.
    pub shape: Vec<usize>,
    /// Total number of sites.
    pub n_spins: usize,
    /// Number of forward bond directions per site.
    pub n_directions: usize,
    /// `forward[i * n_directions + d]` is the site reached from `i` along `d`.
    forward: Vec<usize>,
}

impl Lattice {
    /// Hypercubic lattice with the given shape, e.g. `vec![16, 16]`.
    pub fn hypercubic(shape: Vec<usize>) -> Self {
        let n_dims = shape.len();
        Self::build(shape, hypercubic(n_dims))
    }

    /// Lattice with arbitrary bond directions in lattice coordinates, e.g.
    /// `[[1,0], [0,1], [1,-1]]` for the triangular lattice.
    ///
    /// Periodic wrapping is applied with `rem_euclid`. Every direction must
    /// have one component per dimension of `shape`.
    pub fn with_directions(shape: Vec<usize>, directions: Vec<Vec<isize>>) -> AnnealResult<Self> {
        for dir in &directions {
            check_len("bond direction", shape.len(), dir.len())?;
        }
        Ok(Self::build(shape, directions))
    }

    fn build(shape: Vec<usize>, directions: Vec<Vec<isize>>) -> Self {
        let n_dims = shape.len();
        let n_spins: usize = shape.iter().product();
        let n_directions = directions.len();

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        let mut forward = Vec::with_capacity(n_spins * n_directions);
        for i in 0..n_spins {
            for dir in &directions {
                let site = (0..n_dims)
                    .map(|k| {
                        let coord = ((i / strides[k]) % shape[k]) as isize;
                        (coord + dir[k]).rem_euclid(shape[k] as isize) as usize * strides[k]
                    })
                    .sum::<usize>();
                forward.push(site);
            }
        }

        Self {
            shape,
            n_spins,
            n_directions,
            forward,
        }
    }

    /// Site reached from `site` by one step along direction `d`.
    #[inline]
    pub fn forward(&self, site: usize, d: usize) -> usize {
        self.forward[site * self.n_directions + d]
    }
}
