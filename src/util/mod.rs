//! Small shared helpers with no layer dependencies.

pub mod duration;
