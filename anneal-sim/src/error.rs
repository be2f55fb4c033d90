//! Error types for the annealing engines.

use thiserror::Error;

/// Caller precondition and input-integrity failures.
///
/// Every engine entry point validates its inputs before touching the spin
/// buffer, so an `Err` always leaves the caller's configuration untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnnealError {
    /// Sweep count per schedule value must be at least 1.
    #[error("sweeps per schedule value must be at least 1, got {0}")]
    InvalidSweeps(usize),

    /// A schedule value is zero, negative, or not finite.
    #[error("schedule value {value} at index {index} must be finite and > 0")]
    InvalidControl {
        /// Position in the schedule.
        index: usize,
        /// The offending value.
        value: f32,
    },

    /// Worker pool size must be at least 1.
    #[error("worker count must be at least 1, got {0}")]
    InvalidWorkers(usize),

    /// Trotter slice count must be at least 1.
    #[error("Trotter slice count must be at least 1, got {0}")]
    InvalidSlices(usize),

    /// Fixed temperature of the quantum run must be finite and > 0.
    #[error("temperature must be finite and > 0, got {0}")]
    InvalidTemperature(f32),

    /// The graph has no spins.
    #[error("coupling graph has no spins")]
    EmptyGraph,

    /// A buffer's length does not match the expected shape.
    #[error("{what}: expected length {expected}, got {got}")]
    LengthMismatch {
        /// Which buffer.
        what: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        got: usize,
    },

    /// A spin entry is neither +1 nor -1.
    #[error("spin {index} has value {value}, expected +1 or -1")]
    InvalidSpin {
        /// Flat index of the entry.
        index: usize,
        /// The offending value.
        value: i8,
    },

    /// A coupling-graph entry names a spin that does not exist.
    #[error("spin {spin} lists neighbor {neighbor} but the graph has only {n_spins} spins")]
    NeighborOutOfRange {
        /// Spin owning the list.
        spin: usize,
        /// The out-of-range neighbor index.
        neighbor: usize,
        /// Number of spins in the graph.
        n_spins: usize,
    },

    /// Malformed problem file.
    #[error("problem file line {line}: {msg}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        msg: String,
    },

    /// Invalid schedule generator parameters.
    #[error("invalid schedule: {0}")]
    Schedule(String),

    /// Run configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Reading a problem file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for annealing operations.
pub type AnnealResult<T> = Result<T, AnnealError>;

pub(crate) fn check_sweeps(sweeps: usize) -> AnnealResult<()> {
    if sweeps == 0 {
        return Err(AnnealError::InvalidSweeps(sweeps));
    }
    Ok(())
}

/// Every schedule value must be finite and strictly positive. An empty
/// schedule is accepted and makes the run a no-op.
pub(crate) fn check_schedule(schedule: &[f32]) -> AnnealResult<()> {
    match schedule
        .iter()
        .position(|&v| !(v.is_finite() && v > 0.0))
    {
        Some(index) => Err(AnnealError::InvalidControl {
            index,
            value: schedule[index],
        }),
        None => Ok(()),
    }
}

pub(crate) fn check_len(what: &'static str, expected: usize, got: usize) -> AnnealResult<()> {
    if expected != got {
        return Err(AnnealError::LengthMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}

pub(crate) fn check_spins(spins: &[i8]) -> AnnealResult<()> {
    match spins.iter().position(|&s| s != 1 && s != -1) {
        Some(index) => Err(AnnealError::InvalidSpin {
            index,
            value: spins[index],
        }),
        None => Ok(()),
    }
}
