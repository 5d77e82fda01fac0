// Domain layer: record-store entities and the store port.

pub mod model;
pub mod ports;
