// src/filtering/mod.rs

mod one_euro;
mod point_filter;

pub use one_euro::{OneEuroFilter, MIN_DT_SECS};
pub use point_filter::{LandmarkFilterBank, OneEuroPointFilter, DEFAULT_MAX_JUMP};
