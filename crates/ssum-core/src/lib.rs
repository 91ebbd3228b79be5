pub mod bounded;
pub mod rapidity;
pub mod status;
pub mod value;

pub use bounded::{atanh, clamp, clamp01, tanh, DEFAULT_EPS};
pub use rapidity::{
    signature_from_step, update_alignment, BaselineConvention, Observation, RapidityState,
    UpdatePolicy, UpdateRule, DEFAULT_ALPHA, DEFAULT_GAIN, DEFAULT_GAIN_S, U_MAX,
};
pub use status::{ParseStatusError, StatusLevel};
pub use value::{band, projection, projection_holds, Band, StructuralValue};
