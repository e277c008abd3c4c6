pub mod files;
pub mod hackathons;
pub mod submissions;

mod upload;
