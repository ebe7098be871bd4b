pub mod in_memory;
pub mod static_gateway;
