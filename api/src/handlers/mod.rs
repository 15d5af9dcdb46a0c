pub mod datasets;
pub mod labeling;
pub mod signals;
