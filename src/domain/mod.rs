// Domain layer: tournament models and the ports to external data sources.

pub mod model;
pub mod ports;
