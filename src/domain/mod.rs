// Domain layer: raw API records, flat output rows, and ports (interfaces).

pub mod model;
pub mod ports;
