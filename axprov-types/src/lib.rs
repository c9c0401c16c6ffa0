pub mod device;
pub mod user;

pub use device::{DeviceName, DeviceNameError, Phone};
pub use user::{EndUser, UserId, UserIdError, UserUpdate};
