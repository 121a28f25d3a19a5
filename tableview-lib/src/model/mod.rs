//! Wire types exchanged with the grid endpoints.

mod record;
mod response;

pub use record::*;
pub use response::*;
