mod entry;
mod user;

pub use entry::*;
pub use user::*;
