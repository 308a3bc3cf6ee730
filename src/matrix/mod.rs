pub mod construction;
pub mod model;
pub mod serialization;
pub mod sparse;

pub use construction::MatrixLoader;
pub use model::InputMatrix;
pub use serialization::MatrixWriter;
pub use sparse::{SparseColumns, sparse_dot};
