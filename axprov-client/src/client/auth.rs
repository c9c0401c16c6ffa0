use std::fmt::{Debug, Formatter};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// Username and password sent with every request via HTTP basic
/// authentication.
#[derive(Clone)]
pub struct BasicCredentials {
    username: String,
    password: String,
}

impl BasicCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn sensitive_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let encoded = BASE64.encode(format!("{}:{}", self.username, self.password));
        let mut header = HeaderValue::from_str(&format!("Basic {encoded}"))?;
        header.set_sensitive(true);
        Ok(header)
    }
}

impl Debug for BasicCredentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "BasicCredentials {{ username: {:?}, password: **** }}", self.username)
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn header_should_carry_the_encoded_credentials() -> anyhow::Result<()> {
        let credentials = BasicCredentials::new("administrator", "Cisco1234!");

        let header = credentials.sensitive_header()?;

        assert_that!(header.is_sensitive(), eq(true));
        assert_that!(header.to_str()?, eq("Basic YWRtaW5pc3RyYXRvcjpDaXNjbzEyMzQh"));
        Ok(())
    }

    #[test]
    fn debug_output_should_not_leak_the_password() {
        let credentials = BasicCredentials::new("administrator", "Cisco1234!");
        let rendered = format!("{credentials:?}");
        assert_that!(rendered.as_str(), not(contains_substring("Cisco1234!")));
    }
}
