pub mod logger;
pub mod sync;
pub mod testing;
