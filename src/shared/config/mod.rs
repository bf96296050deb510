pub mod model;

pub use model::{Settings, load_settings};

#[cfg(test)]
mod model_test;
