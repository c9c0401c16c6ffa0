//! SOAP 1.1 envelope encoding and decoding for AXL request/response bodies.

use std::io::Cursor;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use axprov_types::{EndUser, Phone, UserUpdate};

use crate::error::{EnvelopeError, Fault};

const SOAP_ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

pub type EnvelopeWriter = Writer<Cursor<Vec<u8>>>;

/// Payload types serialize themselves into the operation element of the
/// request body.
pub trait WriteXml {
    fn write_xml(&self, writer: &mut EnvelopeWriter) -> Result<(), EnvelopeError>;
}

/// Render a complete request envelope for `operation` in the service's
/// target namespace.
pub fn encode_request(namespace: &str, operation: &str, payload: &dyn WriteXml) -> Result<String, EnvelopeError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write_event(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut envelope = BytesStart::new("soapenv:Envelope");
    envelope.push_attribute(("xmlns:soapenv", SOAP_ENVELOPE_NAMESPACE));
    envelope.push_attribute(("xmlns:axl", namespace));
    write_event(&mut writer, Event::Start(envelope))?;

    write_event(&mut writer, Event::Start(BytesStart::new("soapenv:Body")))?;

    let operation_tag = format!("axl:{operation}");
    write_event(&mut writer, Event::Start(BytesStart::new(operation_tag.as_str())))?;

    payload.write_xml(&mut writer)?;

    write_event(&mut writer, Event::End(BytesStart::new(operation_tag.as_str()).to_end()))?;
    write_event(&mut writer, Event::End(BytesStart::new("soapenv:Body").to_end()))?;
    write_event(&mut writer, Event::End(BytesStart::new("soapenv:Envelope").to_end()))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|cause| EnvelopeError::Write(cause.to_string()))
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DecodedResponse {
    Fault(Fault),
    Success { return_value: Option<String> },
}

/// Decode a response body: a `Fault` element anywhere in the envelope wins,
/// otherwise the text of the first `return` element is captured.
///
/// Element names are matched by local name, so the server's choice of
/// namespace prefixes does not matter.
pub fn decode_response(xml: &str) -> Result<DecodedResponse, EnvelopeError> {
    #[derive(Clone, Copy)]
    enum Capture {
        FaultCode,
        FaultString,
        Return,
    }

    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut fault_seen = false;
    let mut fault_code: Option<String> = None;
    let mut fault_string: Option<String> = None;
    let mut return_value: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                capture = match e.name().local_name().as_ref() {
                    b"Fault" => {
                        fault_seen = true;
                        None
                    }
                    b"faultcode" => Some(Capture::FaultCode),
                    b"faultstring" => Some(Capture::FaultString),
                    b"return" => Some(Capture::Return),
                    _ => None,
                };
            }
            Ok(Event::Text(ref e)) => {
                if let Some(field) = capture.take() {
                    let text = e.unescape()
                        .map_err(|cause| EnvelopeError::Read(cause.to_string()))?
                        .to_string();
                    match field {
                        Capture::FaultCode => fault_code = Some(text),
                        Capture::FaultString => fault_string = Some(text),
                        Capture::Return => {
                            if return_value.is_none() {
                                return_value = Some(text);
                            }
                        }
                    }
                }
            }
            Ok(Event::End(_)) => capture = None,
            Ok(Event::Eof) => break,
            Err(cause) => return Err(EnvelopeError::Read(cause.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if fault_seen {
        Ok(DecodedResponse::Fault(Fault {
            code: fault_code.unwrap_or_default(),
            message: fault_string.unwrap_or_default(),
        }))
    } else {
        Ok(DecodedResponse::Success { return_value })
    }
}

/// Re-indent an XML document for display. Returns the input unchanged when
/// it does not parse.
pub fn pretty_print(xml: &str) -> String {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(event) => {
                if writer.write_event(event).is_err() {
                    return String::from(xml);
                }
            }
            Err(_) => return String::from(xml),
        }
        buf.clear();
    }

    String::from_utf8(writer.into_inner().into_inner())
        .unwrap_or_else(|_| String::from(xml))
}

fn write_event(writer: &mut EnvelopeWriter, event: Event<'_>) -> Result<(), EnvelopeError> {
    writer.write_event(event)
        .map_err(|cause| EnvelopeError::Write(cause.to_string()))
}

pub(crate) fn write_text_element(writer: &mut EnvelopeWriter, name: &str, value: &str) -> Result<(), EnvelopeError> {
    write_event(writer, Event::Start(BytesStart::new(name)))?;
    write_event(writer, Event::Text(BytesText::new(value)))?;
    write_event(writer, Event::End(BytesStart::new(name).to_end()))?;
    Ok(())
}

/// A removal request keyed by a single identifying element.
pub(crate) struct Keyed<'a> {
    pub element: &'static str,
    pub value: &'a str,
}

impl WriteXml for Keyed<'_> {
    fn write_xml(&self, writer: &mut EnvelopeWriter) -> Result<(), EnvelopeError> {
        write_text_element(writer, self.element, self.value)
    }
}

impl WriteXml for Phone {
    fn write_xml(&self, writer: &mut EnvelopeWriter) -> Result<(), EnvelopeError> {
        write_event(writer, Event::Start(BytesStart::new("phone")))?;
        write_text_element(writer, "name", self.name.value())?;
        write_text_element(writer, "product", &self.product)?;
        write_text_element(writer, "model", &self.model)?;
        write_text_element(writer, "class", &self.class)?;
        write_text_element(writer, "protocol", &self.protocol)?;
        write_text_element(writer, "protocolSide", &self.protocol_side)?;
        write_text_element(writer, "devicePoolName", &self.device_pool_name)?;
        write_text_element(writer, "commonPhoneConfigName", &self.common_phone_config_name)?;
        write_text_element(writer, "locationName", &self.location_name)?;
        write_text_element(writer, "useTrustedRelayPoint", &self.use_trusted_relay_point)?;
        write_text_element(writer, "builtInBridgeStatus", &self.built_in_bridge_status)?;
        write_text_element(writer, "packetCaptureMode", &self.packet_capture_mode)?;
        write_text_element(writer, "certificateOperation", &self.certificate_operation)?;
        write_text_element(writer, "deviceMobilityMode", &self.device_mobility_mode)?;
        write_event(writer, Event::End(BytesStart::new("phone").to_end()))?;
        Ok(())
    }
}

impl WriteXml for EndUser {
    fn write_xml(&self, writer: &mut EnvelopeWriter) -> Result<(), EnvelopeError> {
        write_event(writer, Event::Start(BytesStart::new("user")))?;
        write_text_element(writer, "userid", self.user_id.value())?;
        write_text_element(writer, "lastName", &self.last_name)?;
        write_text_element(writer, "password", &self.password)?;
        write_text_element(writer, "presenceGroupName", &self.presence_group_name)?;
        write_event(writer, Event::End(BytesStart::new("user").to_end()))?;
        Ok(())
    }
}

impl WriteXml for UserUpdate {
    fn write_xml(&self, writer: &mut EnvelopeWriter) -> Result<(), EnvelopeError> {
        write_text_element(writer, "userid", self.user_id.value())?;
        write_event(writer, Event::Start(BytesStart::new("associatedDevices")))?;
        for device in &self.associated_devices {
            write_text_element(writer, "device", device.value())?;
        }
        write_event(writer, Event::End(BytesStart::new("associatedDevices").to_end()))?;
        write_text_element(writer, "homeCluster", bool_text(self.home_cluster))?;
        write_text_element(writer, "imAndPresenceEnable", bool_text(self.im_and_presence_enable))?;
        Ok(())
    }
}

fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
