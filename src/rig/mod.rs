pub mod opts;
pub mod runtime;
