mod file_type;
mod hackathon;
mod stored_file;
mod stored_object;
mod submission;

pub use file_type::{FileType, extension_of};
pub use hackathon::{Criterion, Hackathon, HackathonStatus};
pub use stored_file::StoredFile;
pub use stored_object::StoredObject;
pub use submission::Submission;
