pub mod audit;
pub mod course;
pub mod credits;
pub mod status;
pub mod student;
