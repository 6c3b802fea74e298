pub mod pin_resets;
pub mod users;
