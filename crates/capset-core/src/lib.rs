//! Core types shared across the cap enumeration workspace: affine arithmetic
//! over `Z_3^n`, dimension-derived constants, structured errors, the
//! deterministic RNG policy, and run provenance descriptors.

pub mod affine;
pub mod dimension;
pub mod errors;
pub mod provenance;
pub mod rng;

pub use affine::Point;
pub use dimension::Dimension;
pub use errors::{CapError, ErrorInfo};
pub use rng::{derive_substream_seed, RngHandle};
