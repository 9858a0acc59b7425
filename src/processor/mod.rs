pub mod job;
pub mod worker;
