pub mod completion_latch;
pub mod worker_pool;
