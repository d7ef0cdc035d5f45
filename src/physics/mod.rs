pub mod constraint;
pub mod motion;
pub mod node;
