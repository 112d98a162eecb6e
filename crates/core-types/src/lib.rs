pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::Backend;
pub use error::CoreError;
pub use structs::{
    Account, Checkin, CheckinHit, CoreSettings, Failure, Hit, Message, Monitor, TIME_DAY,
    TIME_FORMAT,
};
