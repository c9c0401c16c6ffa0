use reqwest::Url;

use crate::error::CreateClientError;

/// The administration interface lives under `/axl/` on the call manager's
/// web service port.
pub fn endpoint(host: &str, port: u16) -> Result<Url, CreateClientError> {
    let value = format!("https://{host}:{port}/axl/");
    Url::parse(&value)
        .map_err(|cause| CreateClientError::InvalidEndpoint { value, cause: cause.to_string() })
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[test]
    fn should_build_the_administration_endpoint() -> anyhow::Result<()> {
        let result = endpoint("ucm1.example.org", 8443)?;
        assert_that!(result.as_str(), eq("https://ucm1.example.org:8443/axl/"));
        Ok(())
    }

    #[test]
    fn should_reject_an_unparsable_server_address() {
        let result = endpoint("not a host", 8443);
        assert_that!(result, err(matches_pattern!(CreateClientError::InvalidEndpoint { value: anything(), cause: anything() })));
    }
}
