// Adapters layer: concrete implementations of the domain ports against external systems.

pub mod abi;
pub mod rpc;

pub use rpc::RpcClient;
