//! Request authentication for the collection service

use reqwest::RequestBuilder;

use crate::config::AuthMode;
use crate::constants::{AUTH_HEADER, DEV_AUTH_TOKEN};
use crate::{Error, Result};

/// Strategy attaching credentials to outgoing collection service requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authenticator {
    /// Fixed development token
    Development,
    /// Production credentials (no strategy available yet)
    Production,
}

impl Authenticator {
    /// Select the authenticator for a configured mode
    ///
    /// Unimplemented modes are rejected here so that they surface at startup
    /// and never mid-request.
    pub fn for_mode(mode: AuthMode) -> Result<Self> {
        match mode {
            AuthMode::Development => Ok(Self::Development),
            AuthMode::Production => Err(Error::configuration(
                "Authentication mode 'production' is not implemented",
            )),
        }
    }

    pub fn mode(&self) -> AuthMode {
        match self {
            Self::Development => AuthMode::Development,
            Self::Production => AuthMode::Production,
        }
    }

    /// Attach credentials to a request
    pub fn authenticate(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match self {
            Self::Development => Ok(request.header(AUTH_HEADER, DEV_AUTH_TOKEN)),
            Self::Production => Err(Error::configuration(
                "Authentication mode 'production' is not implemented",
            )),
        }
    }
}
