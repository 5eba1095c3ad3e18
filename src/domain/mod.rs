// Domain layer: data model and the ports the batch talks through.

pub mod model;
pub mod ports;
