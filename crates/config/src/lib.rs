// Configuration loading

pub mod settings;

pub use settings::{ColorMode, Settings};
