use std::sync::{LazyLock, RwLock};

pub static CONFIGURATION: LazyLock<RwLock<Configuration>> =
    LazyLock::new(|| RwLock::new(Configuration::default()));

pub struct Configuration {
    /// Lower flux bound assigned to reactions which don't specify one
    pub lower_bound: f64,
    /// Upper flux bound assigned to reactions which don't specify one
    pub upper_bound: f64,
    /// Tolerance below which a normalization divisor is considered degenerate
    pub tolerance: f64,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            lower_bound: -1000.,
            upper_bound: 1000.,
            tolerance: 1e-07,
        }
    }
}
