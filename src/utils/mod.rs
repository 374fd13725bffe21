mod aggregation;

pub use aggregation::{align_series, count_per_day};
