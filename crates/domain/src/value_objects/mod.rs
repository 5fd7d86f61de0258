//! Value objects - immutable types defined by their attributes

mod coordinate;
mod email_address;
mod fixed_point;
mod password;
mod user_id;

pub use coordinate::Coordinate;
pub use email_address::EmailAddress;
pub use fixed_point::FixedPoint;
pub use password::Password;
pub use user_id::UserId;
