pub mod target_units;
pub mod weight_factors;

pub use target_units::{nav, target_units};
pub use weight_factors::{
    MAX_HHI_SCORE, hhi_weight_factors, operator_weight_factors, protocol_hhi_scores,
    target_weights,
};
