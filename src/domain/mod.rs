// Domain layer: taxon pairs, divergence records and the ports the engine talks through.

pub mod model;
pub mod ports;
