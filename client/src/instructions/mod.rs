pub mod rpc;
pub mod stake_instructions;
pub mod utils;
