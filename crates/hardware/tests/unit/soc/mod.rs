pub mod interconnect;
pub mod memory;
