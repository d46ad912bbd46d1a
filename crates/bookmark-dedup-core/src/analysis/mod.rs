pub mod deletion_plan;
pub mod grouper;
pub mod review;
