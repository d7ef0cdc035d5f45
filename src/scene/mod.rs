pub mod description;
pub mod validate;
