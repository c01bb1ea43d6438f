pub mod link_validator;
pub mod recommendations;
pub mod scoring;
pub mod selection;
