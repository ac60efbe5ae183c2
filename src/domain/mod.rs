// Domain layer: channel model and the platform port.

pub mod model;
pub mod ports;
