pub mod by_pool;
pub mod percentage;

pub use by_pool::ByPool;
pub use percentage::Percentage;
