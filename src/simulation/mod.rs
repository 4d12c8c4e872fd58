pub mod engine;
pub mod ledger;

pub use engine::simulate;
pub use ledger::{AmortizationMonth, SimulationResult};
