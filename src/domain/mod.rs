// Domain layer: record model, query vocabulary and ports (interfaces) to the external chain.

pub mod model;
pub mod ports;
pub mod query;
