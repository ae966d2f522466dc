// Shared record shapes for gallery media
mod format;
mod types;

pub use format::format_file_size;
pub use types::*;
