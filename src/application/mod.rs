// Application layer: the two services carrying the business rules, plus
// their shared error taxonomy. Everything else is plumbing around them.

mod entries;
mod error;
mod users;

pub use entries::*;
pub use error::*;
pub use users::*;
