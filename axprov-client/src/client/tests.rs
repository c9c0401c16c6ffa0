#![cfg(test)]

use std::path::PathBuf;
use std::result::Result;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use googletest::prelude::*;
use http::StatusCode;
use indoc::indoc;
use reqwest::header::HeaderMap;
use reqwest::{Method, Request, Response, Url};
use rstest::{fixture, rstest};

use axprov_types::{DeviceName, EndUser, Phone, UserId, UserUpdate};

use crate::client::request_handler::RequestHandler;
use crate::client::{AxlClient, AxlClientConfig, BasicCredentials, TlsPolicy};
use crate::error::{CallError, CreateClientError, RequestError};
use crate::observer::RequestObserver;
use crate::wsdl::ServiceDescription;
use crate::AxlApi;

const DESCRIPTION: &str = indoc! {r#"
    <definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
                 xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
                 targetNamespace="http://www.cisco.com/AXL/API/14.0">
      <binding name="AXLAPIBinding">
        <operation name="addPhone">
          <soap:operation soapAction="CUCM:DB ver=14.0 addPhone"/>
        </operation>
        <operation name="addUser">
          <soap:operation soapAction="CUCM:DB ver=14.0 addUser"/>
        </operation>
        <operation name="updateUser">
          <soap:operation soapAction="CUCM:DB ver=14.0 updateUser"/>
        </operation>
        <operation name="removeUser">
          <soap:operation soapAction="CUCM:DB ver=14.0 removeUser"/>
        </operation>
        <operation name="removePhone">
          <soap:operation soapAction="CUCM:DB ver=14.0 removePhone"/>
        </operation>
      </binding>
    </definitions>
"#};

const PKID: &str = "{5239e7cd-3f96-4d1b-9b6c-52b3c1f1c349}";

const FAULT_RESPONSE: &str = indoc! {r#"
    <soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
      <soapenv:Body>
        <soapenv:Fault>
          <faultcode>soapenv:Client</faultcode>
          <faultstring>Could not insert new row - duplicate value in a UNIQUE INDEX column</faultstring>
        </soapenv:Fault>
      </soapenv:Body>
    </soapenv:Envelope>
"#};

#[rstest]
#[tokio::test]
async fn add_phone_should_post_a_request_envelope(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|request: Request| {
        assert_that!(request.method(), eq(&Method::POST));
        assert_that!(request.url().path(), eq("/axl/"));
        assert_that!(soap_action(&request).as_str(), eq("\"CUCM:DB ver=14.0 addPhone\""));

        let body = request_body(&request);
        assert_that!(body.as_str(), contains_substring("<axl:addPhone><phone><name>CSFTESTPHONE</name>"));
        assert_that!(body.as_str(), contains_substring("<protocol>SIP</protocol>"));

        Ok(Response::from(http::Response::builder()
            .body(success_response("addPhone"))
            .unwrap()))
    });

    let client = fixture.client(requester);

    let result = client.add_phone(&Phone::csf(DeviceName::try_from("CSFTESTPHONE")?)).await?;

    assert_that!(result.return_value, some(eq(PKID)));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn add_user_should_post_a_request_envelope(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|request: Request| {
        let body = request_body(&request);
        assert_that!(body.as_str(), contains_substring("<axl:addUser><user><userid>testEndUser</userid>"));
        assert_that!(body.as_str(), contains_substring("<presenceGroupName>Standard Presence Group</presenceGroupName>"));

        Ok(Response::from(http::Response::builder()
            .body(success_response("addUser"))
            .unwrap()))
    });

    let client = fixture.client(requester);

    let user = EndUser::new(UserId::try_from("testEndUser")?, "testEndUser", "Cisco1234!");
    let result = client.add_user(&user).await?;

    assert_that!(result.return_value, some(eq(PKID)));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn update_user_should_list_the_associated_devices(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|request: Request| {
        assert_that!(soap_action(&request).as_str(), eq("\"CUCM:DB ver=14.0 updateUser\""));

        let body = request_body(&request);
        assert_that!(body.as_str(), contains_substring("<axl:updateUser><userid>testEndUser</userid>"));
        assert_that!(body.as_str(), contains_substring("<associatedDevices><device>CSFTESTPHONE</device></associatedDevices>"));
        assert_that!(body.as_str(), contains_substring("<homeCluster>true</homeCluster>"));

        Ok(Response::from(http::Response::builder()
            .body(success_response("updateUser"))
            .unwrap()))
    });

    let client = fixture.client(requester);

    let update = UserUpdate {
        user_id: UserId::try_from("testEndUser")?,
        associated_devices: vec![DeviceName::try_from("CSFTESTPHONE")?],
        home_cluster: true,
        im_and_presence_enable: true,
    };
    let result = client.update_user(&update).await;

    assert_that!(result, ok(anything()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn remove_user_should_be_keyed_by_user_id(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|request: Request| {
        let body = request_body(&request);
        assert_that!(body.as_str(), contains_substring("<axl:removeUser><userid>testEndUser</userid></axl:removeUser>"));

        Ok(Response::from(http::Response::builder()
            .body(success_response("removeUser"))
            .unwrap()))
    });

    let client = fixture.client(requester);

    let result = client.remove_user(&UserId::try_from("testEndUser")?).await;

    assert_that!(result, ok(anything()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn remove_phone_should_be_keyed_by_device_name(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|request: Request| {
        let body = request_body(&request);
        assert_that!(body.as_str(), contains_substring("<axl:removePhone><name>CSFTESTPHONE</name></axl:removePhone>"));

        Ok(Response::from(http::Response::builder()
            .body(success_response("removePhone"))
            .unwrap()))
    });

    let client = fixture.client(requester);

    let result = client.remove_phone(&DeviceName::try_from("CSFTESTPHONE")?).await;

    assert_that!(result, ok(anything()));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn a_fault_response_should_surface_as_a_fault(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|_| {
        Ok(Response::from(http::Response::builder()
            .status(500)
            .body(FAULT_RESPONSE)
            .unwrap()))
    });

    let client = fixture.client(requester);

    let result = client.add_phone(&Phone::csf(DeviceName::try_from("CSFTESTPHONE")?)).await;

    assert_that!(result, err(matches_pattern!(CallError::Fault { operation: eq("addPhone"), fault: anything() })));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn a_faultless_error_status_should_surface_as_a_transport_error(fixture: Fixture) -> anyhow::Result<()> {

    let requester = MockRequester::new(|_| {
        Ok(Response::from(http::Response::builder()
            .status(503)
            .body("<html><body>Service Unavailable</body></html>")
            .unwrap()))
    });

    let client = fixture.client(requester);

    let result = client.add_user(&EndUser::new(UserId::try_from("testEndUser")?, "testEndUser", "Cisco1234!")).await;

    assert_that!(result, err(matches_pattern!(CallError::Transport {
        operation: eq("addUser"),
        cause: matches_pattern!(RequestError::IllegalRequest(anything(), anything())),
    })));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn an_observer_should_see_each_message_once_and_unaltered(fixture: Fixture) -> anyhow::Result<()> {

    let transported = Arc::new(Mutex::new(Vec::<String>::new()));
    let requester = {
        let transported = Arc::clone(&transported);
        MockRequester::new(move |request: Request| {
            transported.lock().unwrap().push(request_body(&request));
            Ok(Response::from(http::Response::builder()
                .body(success_response("removePhone"))
                .unwrap()))
        })
    };

    let observer = RecordingObserver::default();
    let egress = Arc::clone(&observer.egress);
    let ingress = Arc::clone(&observer.ingress);

    let client = fixture.client(requester).with_observer(Box::new(observer));

    client.remove_phone(&DeviceName::try_from("CSFTESTPHONE")?).await?;

    let egress = egress.lock().unwrap();
    let ingress = ingress.lock().unwrap();
    let transported = transported.lock().unwrap();

    assert_that!(*egress, len(eq(1)));
    assert_that!(*ingress, len(eq(1)));
    assert_that!(*transported, len(eq(1)));
    assert_that!(egress[0].as_str(), eq(transported[0].as_str()));
    Ok(())
}

#[rstest]
fn create_should_reject_a_description_missing_an_operation(fixture: Fixture) {

    let incomplete = indoc! {r#"
        <definitions targetNamespace="http://www.cisco.com/AXL/API/14.0">
          <binding name="AXLAPIBinding">
            <operation name="addPhone">
              <soap:operation soapAction="CUCM:DB ver=14.0 addPhone"/>
            </operation>
          </binding>
        </definitions>
    "#};
    let description = ServiceDescription::parse(PathBuf::from("AXLAPI.wsdl"), incomplete).unwrap();

    let result = AxlClient::create(fixture.config(TlsPolicy::Insecure), description);

    assert_that!(result, err(matches_pattern!(CreateClientError::MissingOperation { operation: eq("addUser") })));
}

#[rstest]
fn create_should_reject_an_unreadable_trust_bundle(fixture: Fixture) {

    let tls = TlsPolicy::TrustBundle(PathBuf::from("does/not/exist/tomcat.pem"));

    let result = AxlClient::create(fixture.config(tls), fixture.description());

    assert_that!(result, err(matches_pattern!(CreateClientError::TrustBundle { path: anything(), cause: anything() })));
}

#[rstest]
fn create_should_accept_the_insecure_tls_policy(fixture: Fixture) {

    let result = AxlClient::create(fixture.config(TlsPolicy::Insecure), fixture.description());

    assert_that!(result, ok(anything()));
}

#[fixture]
fn fixture() -> Fixture {
    Fixture {
        endpoint: Url::parse("https://ucm1.example.org:8443/axl/").unwrap(),
    }
}

struct Fixture {
    endpoint: Url,
}

impl Fixture {
    fn description(&self) -> ServiceDescription {
        ServiceDescription::parse(PathBuf::from("AXLAPI.wsdl"), DESCRIPTION).unwrap()
    }

    fn config(&self, tls: TlsPolicy) -> AxlClientConfig {
        AxlClientConfig {
            host: String::from("ucm1.example.org"),
            port: 8443,
            credentials: BasicCredentials::new("administrator", "Cisco1234!"),
            tls,
            timeout: Duration::from_secs(10),
        }
    }

    fn client<F>(&self, requester: MockRequester<F>) -> AxlClient
    where
        F: Fn(Request) -> Result<Response, RequestError> + Send + Sync + 'static,
    {
        AxlClient::new(Clone::clone(&self.endpoint), self.description(), Box::new(requester))
    }
}

struct MockRequester<F>
where
    F: Fn(Request) -> Result<Response, RequestError> + Send + Sync,
{
    handler: F,
}

impl<F> MockRequester<F>
where
    F: Fn(Request) -> Result<Response, RequestError> + Send + Sync,
{
    fn new(handler: F) -> Self {
        Self { handler }
    }
}

#[async_trait]
impl<F> RequestHandler for MockRequester<F>
where
    F: Fn(Request) -> Result<Response, RequestError> + Send + Sync,
{
    async fn handle(&self, request: Request) -> Result<Response, RequestError> {
        (self.handler)(request)
    }
}

#[derive(Default)]
struct RecordingObserver {
    egress: Arc<Mutex<Vec<String>>>,
    ingress: Arc<Mutex<Vec<String>>>,
}

impl RequestObserver for RecordingObserver {
    fn egress(&self, _operation: &str, _headers: &HeaderMap, body: &str) {
        self.egress.lock().unwrap().push(String::from(body));
    }

    fn ingress(&self, _operation: &str, _status: StatusCode, body: &str) {
        self.ingress.lock().unwrap().push(String::from(body));
    }
}

fn success_response(operation: &str) -> String {
    format!(
        concat!(
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<soapenv:Body><ns:{operation}Response xmlns:ns="http://www.cisco.com/AXL/API/14.0">"#,
            r#"<return>{pkid}</return></ns:{operation}Response></soapenv:Body></soapenv:Envelope>"#,
        ),
        operation = operation,
        pkid = PKID,
    )
}

fn request_body(request: &Request) -> String {
    let bytes = request.body().unwrap().as_bytes().unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn soap_action(request: &Request) -> String {
    String::from(request.headers().get("SOAPAction").unwrap().to_str().unwrap())
}
