pub mod coupling;
pub mod lattice;
pub mod problem;

pub use coupling::CouplingGraph;
pub use lattice::{hypercubic, Lattice};
pub use problem::{parse_problem, read_problem};
