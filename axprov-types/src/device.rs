use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceName { name: String }

impl DeviceName {
    pub const MAX_LENGTH: usize = 15;

    pub fn value(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DeviceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl TryFrom<String> for DeviceName {
    type Error = DeviceNameError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            Err(DeviceNameError::Empty)
        } else if value.len() > Self::MAX_LENGTH {
            Err(DeviceNameError::TooLong { value, max: Self::MAX_LENGTH })
        } else {
            Ok(Self { name: value })
        }
    }
}

impl TryFrom<&str> for DeviceName {
    type Error = DeviceNameError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_from(String::from(value))
    }
}

impl std::str::FromStr for DeviceName {
    type Err = DeviceNameError;
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::try_from(String::from(value))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DeviceNameError {
    #[error("Name for a device may not be empty!")]
    Empty,
    #[error("The call manager limits device names to {max} characters!")]
    TooLong { value: String, max: usize }
}

/// Add-phone request payload.
///
/// The field set is the minimum the call manager's schema requires for
/// device creation. Fields are serialized in declaration order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Phone {
    pub name: DeviceName,
    pub product: String,
    pub model: String,
    pub class: String,
    pub protocol: String,
    pub protocol_side: String,
    pub device_pool_name: String,
    pub common_phone_config_name: String,
    pub location_name: String,
    pub use_trusted_relay_point: String,
    pub built_in_bridge_status: String,
    pub packet_capture_mode: String,
    pub certificate_operation: String,
    pub device_mobility_mode: String,
}

impl Phone {
    /// A Client Services Framework softphone with the stock configuration
    /// templates applied.
    pub fn csf(name: DeviceName) -> Self {
        Self {
            name,
            product: String::from("Cisco Unified Client Services Framework"),
            model: String::from("Cisco Unified Client Services Framework"),
            class: String::from("Phone"),
            protocol: String::from("SIP"),
            protocol_side: String::from("User"),
            device_pool_name: String::from("Default"),
            common_phone_config_name: String::from("Standard Common Phone Profile"),
            location_name: String::from("Hub_None"),
            use_trusted_relay_point: String::from("Default"),
            built_in_bridge_status: String::from("Default"),
            packet_capture_mode: String::from("None"),
            certificate_operation: String::from("No Pending Operation"),
            device_mobility_mode: String::from("Default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn should_reject_an_empty_device_name() {
        let result = DeviceName::try_from("");
        assert_that!(result, err(matches_pattern!(DeviceNameError::Empty)));
    }

    #[test]
    fn should_reject_an_overlong_device_name() {
        let result = DeviceName::try_from("CSFTESTPHONEWITHANOVERLONGNAME");
        assert_that!(result, err(matches_pattern!(DeviceNameError::TooLong { value: anything(), max: anything() })));
    }

    #[test]
    fn should_accept_a_device_name_at_the_length_limit() -> anyhow::Result<()> {
        let name = DeviceName::try_from("CSFPHONE1234567")?;
        assert_that!(name.value(), eq("CSFPHONE1234567"));
        Ok(())
    }

    #[test]
    fn csf_profile_should_carry_the_stock_templates() -> anyhow::Result<()> {
        let phone = Phone::csf(DeviceName::try_from("CSFTESTPHONE")?);
        assert_that!(phone.class.as_str(), eq("Phone"));
        assert_that!(phone.protocol.as_str(), eq("SIP"));
        assert_that!(phone.device_pool_name.as_str(), eq("Default"));
        assert_that!(phone.common_phone_config_name.as_str(), eq("Standard Common Phone Profile"));
        assert_that!(phone.location_name.as_str(), eq("Hub_None"));
        Ok(())
    }
}
