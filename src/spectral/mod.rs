pub mod eigen;
pub mod gram;
pub mod power;

pub use eigen::{EigenDecomposition, SolverKind, SymmetricSolver};
pub use gram::{GramBuilder, GramPath};
pub use power::PowerDeflationSolver;
