//! Binary masks, morphology and connected-component labeling.

pub mod labels;
pub mod mask;
pub mod morphology;

pub use labels::{label_connected_components, Connectivity, LabelGrid};
pub use mask::BinaryMask;
pub use morphology::{erode, StructuringElement};
