#![allow(dead_code)]

pub mod analyzer;
pub mod harness;
pub mod match_three;

pub mod utils {
    pub mod prelude {
        pub use anyhow::{anyhow, Context, Error};
        pub type Result<T> = anyhow::Result<T, Error>;

        pub use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
    }
}

pub mod prelude {
    pub use super::analyzer::*;
    pub use super::harness::*;
    pub use super::match_three::prelude::*;
    pub use super::utils::prelude::*;
}
