pub mod bindings;
pub mod client;
pub mod protocol;
