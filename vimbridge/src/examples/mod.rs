pub mod v1;
pub mod vim;

pub mod walkthrough;
