pub mod status;
pub mod topic_modeling;
