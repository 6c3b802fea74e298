mod pin_reset;
mod user;

pub use pin_reset::PinReset;
pub use user::User;
