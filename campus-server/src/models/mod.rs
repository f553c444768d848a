//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod user;
pub mod resource;
pub mod booking;
pub mod schedule;

pub use validation::ValidationError;
pub use user::{Email, Password, UserName};
pub use resource::{image_url, Capacity, ResourceKind, ResourceName, ResourceSort, ResourceStatus};
pub use booking::{parse_date, parse_time, BookingStatus, TimeSlot, DATE_FORMAT, TIME_FORMAT};
pub use schedule::{default_close, default_open, free_windows, Window};
