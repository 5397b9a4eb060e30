//! CAS `serviceValidate` response parsing
//!
//! The identity service answers ticket validation with a CAS 2.0
//! `serviceResponse` document (namespace `http://www.yale.edu/tp/cas`):
//!
//! ```xml
//! <cas:serviceResponse xmlns:cas="http://www.yale.edu/tp/cas">
//!   <cas:authenticationSuccess>
//!     <cas:user>someone@example.com</cas:user>
//!     <cas:attributes><cas:token>abc123</cas:token></cas:attributes>
//!   </cas:authenticationSuccess>
//! </cas:serviceResponse>
//! ```
//!
//! Elements are matched on local name, so the prefix the server picks does
//! not matter.

use super::LoginError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Outcome of a ticket validation. Exactly one variant per response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResponse {
    Success(AuthenticationSuccess),
    Failure(AuthenticationFailure),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationSuccess {
    pub user: String,
    pub attributes: Option<Attributes>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticationFailure {
    pub code: String,
    pub message: String,
}

impl ValidationResponse {
    /// Parse a raw `serviceResponse` document
    pub fn parse(xml: &str) -> Result<Self, LoginError> {
        let mut parser = Parser::default();
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    parser.open(e)?;
                    parser.stack.push(local_name(e));
                }
                Ok(Event::Empty(ref e)) => parser.open(e)?,
                Ok(Event::End(_)) => {
                    parser.stack.pop();
                }
                Ok(Event::Text(ref e)) => {
                    let text = e
                        .unescape()
                        .map_err(|err| LoginError::MalformedResponse(err.to_string()))?;
                    parser.text(&text);
                }
                Ok(Event::CData(e)) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    parser.text(&text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(LoginError::MalformedResponse(format!(
                        "error at position {}: {:?}",
                        reader.buffer_position(),
                        e
                    )));
                }
                _ => {}
            }
        }

        parser.finish()
    }

    /// Extract the token, mapping every non-success shape onto its error
    ///
    /// `body` is the raw response, attached to errors for diagnostics.
    pub fn into_token(self, body: &str) -> Result<String, LoginError> {
        match self {
            ValidationResponse::Failure(failure) => Err(LoginError::AuthenticationFailed {
                code: failure.code,
                message: failure.message,
                body: body.to_string(),
            }),
            ValidationResponse::Success(success) => {
                let attributes = success.attributes.ok_or_else(|| {
                    LoginError::MissingToken("no attributes in validation response".to_string())
                })?;
                if attributes.token.is_empty() {
                    return Err(LoginError::MissingToken(
                        "no token in validation response".to_string(),
                    ));
                }
                Ok(attributes.token)
            }
        }
    }
}

#[derive(Default)]
struct Parser {
    stack: Vec<String>,
    saw_root: bool,
    success: Option<AuthenticationSuccess>,
    failure: Option<AuthenticationFailure>,
}

impl Parser {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), LoginError> {
        let name = local_name(e);

        if self.stack.is_empty() {
            if self.saw_root || name != "serviceResponse" {
                return Err(LoginError::MalformedResponse(format!(
                    "unexpected root element <{}>",
                    name
                )));
            }
            self.saw_root = true;
            return Ok(());
        }

        let path: Vec<&str> = self.stack.iter().map(String::as_str).collect();
        match (path.as_slice(), name.as_str()) {
            (["serviceResponse"], "authenticationSuccess") => {
                self.success.get_or_insert_with(Default::default);
            }
            (["serviceResponse"], "authenticationFailure") => {
                let code = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.local_name().into_inner() == b"code")
                    .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
                    .unwrap_or_default();
                self.failure = Some(AuthenticationFailure {
                    code,
                    message: String::new(),
                });
            }
            (["serviceResponse", "authenticationSuccess"], "attributes") => {
                if let Some(success) = self.success.as_mut() {
                    success.attributes.get_or_insert_with(Default::default);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        let path: Vec<&str> = self.stack.iter().map(String::as_str).collect();
        match path.as_slice() {
            ["serviceResponse", "authenticationSuccess", "user"] => {
                if let Some(success) = self.success.as_mut() {
                    success.user.push_str(text);
                }
            }
            ["serviceResponse", "authenticationSuccess", "attributes", "token"] => {
                if let Some(attributes) = self.success.as_mut().and_then(|s| s.attributes.as_mut())
                {
                    attributes.token.push_str(text);
                }
            }
            ["serviceResponse", "authenticationFailure"] => {
                if let Some(failure) = self.failure.as_mut() {
                    failure.message.push_str(text);
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Result<ValidationResponse, LoginError> {
        if !self.saw_root {
            return Err(LoginError::MalformedResponse(
                "missing serviceResponse element".to_string(),
            ));
        }
        if !self.stack.is_empty() {
            return Err(LoginError::MalformedResponse(
                "unexpected end of document".to_string(),
            ));
        }

        match (self.failure, self.success) {
            (Some(mut failure), _) => {
                failure.message = failure.message.trim().to_string();
                Ok(ValidationResponse::Failure(failure))
            }
            (None, Some(mut success)) => {
                success.user = success.user.trim().to_string();
                if let Some(attributes) = success.attributes.as_mut() {
                    attributes.token = attributes.token.trim().to_string();
                }
                Ok(ValidationResponse::Success(success))
            }
            (None, None) => Err(LoginError::MalformedResponse(
                "response has neither authenticationSuccess nor authenticationFailure".to_string(),
            )),
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().into_inner()).to_string()
}
