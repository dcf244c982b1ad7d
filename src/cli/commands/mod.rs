pub mod describe;
pub mod explain;
pub mod ping;
