// Adapters layer: concrete roster and result sources behind the domain ports.

pub mod file;
pub mod fpl;
