//! Array preparation and validation utilities

pub mod norms;
pub mod padding;
pub mod pivoting;
pub mod transform;
pub mod validation;

pub use norms::{frobenius_norm, norm_max};
pub use padding::{hide_zero_padding, zero_padding, PaddingMode, ZERO_PADDING_TOL};
pub use pivoting::{permutation_from_matrix, permutation_matrix};
pub use transform::{compute_centroid, scale_array, translate_array};
pub use validation::{all_finite, is_orthogonal, is_permutation_matrix, is_symmetric};
