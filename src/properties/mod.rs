pub mod command;
pub mod thread_pool;

pub use command::CommandProperties;
pub use thread_pool::{ThreadPoolProperties, ThreadPoolPropertyKey, map_thread_pool_properties};
