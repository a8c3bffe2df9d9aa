pub mod api;
pub mod invocation;
