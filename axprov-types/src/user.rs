use std::fmt;

use serde::{Deserialize, Serialize};

use crate::device::DeviceName;

#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId { id: String }

impl UserId {
    pub const MAX_LENGTH: usize = 128;

    pub fn value(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(UserIdError::Empty)
        } else if value.len() > Self::MAX_LENGTH {
            Err(UserIdError::TooLong { value, max: Self::MAX_LENGTH })
        } else {
            Ok(Self { id: value })
        }
    }
}

impl TryFrom<&str> for UserId {
    type Error = UserIdError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(String::from(value))
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(String::from(value))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum UserIdError {
    #[error("ID for an end user may not be empty!")]
    Empty,
    #[error("The call manager limits user IDs to {max} characters!")]
    TooLong { value: String, max: usize }
}

/// Add-user request payload.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EndUser {
    pub user_id: UserId,
    pub last_name: String,
    pub password: String,
    pub presence_group_name: String,
}

impl EndUser {
    pub fn new(user_id: UserId, last_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id,
            last_name: last_name.into(),
            password: password.into(),
            presence_group_name: String::from("Standard Presence Group"),
        }
    }
}

/// Update-user request payload, keyed by user ID.
///
/// An empty device list clears the user's associations server-side.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub user_id: UserId,
    pub associated_devices: Vec<DeviceName>,
    pub home_cluster: bool,
    pub im_and_presence_enable: bool,
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn should_reject_an_empty_user_id() {
        let result = UserId::try_from("");
        assert_that!(result, err(matches_pattern!(UserIdError::Empty)));
    }

    #[test]
    fn should_reject_an_overlong_user_id() {
        let result = UserId::try_from("x".repeat(UserId::MAX_LENGTH + 1));
        assert_that!(result, err(matches_pattern!(UserIdError::TooLong { value: anything(), max: anything() })));
    }

    #[test]
    fn new_end_user_should_join_the_standard_presence_group() -> anyhow::Result<()> {
        let user = EndUser::new(UserId::try_from("testEndUser")?, "testEndUser", "Cisco1234!");
        assert_that!(user.presence_group_name.as_str(), eq("Standard Presence Group"));
        Ok(())
    }
}
