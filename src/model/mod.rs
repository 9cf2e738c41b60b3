pub(crate) mod error_model;
pub(crate) mod patch;
pub(crate) mod taps;
