// Domain layer: security group models and ports (interfaces). No HTTP here.

pub mod model;
pub mod ports;
