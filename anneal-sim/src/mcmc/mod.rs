pub mod classical;
pub mod metropolis;
pub mod multispin;
pub mod parallel;
pub mod quantum;

pub use classical::anneal_sequential;
pub use multispin::anneal_multispin;
pub use parallel::{anneal_parallel, anneal_parallel_in};
pub use quantum::{anneal_quantum, trotter_coupling};
