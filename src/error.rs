//! Errors that abort a provisioning attempt.

use std::path::PathBuf;

/// Why provisioning failed.
///
/// Cloneable so a failed attempt can be replayed to every later caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionError {
    /// No release asset is published for this `{arch}-{os}`
    UnsupportedPlatform { platform: String },
    /// A directory of the local layout could not be created
    CreateDir { path: PathBuf, reason: String },
    /// The release host could not be reached or the body stream broke
    Network { url: String, reason: String },
    /// The release host answered with something other than 200
    HttpStatus { status: u16, url: String },
    /// Writing the downloaded bytes to disk failed
    Write { path: PathBuf, reason: String },
    /// The body ended before Content-Length bytes arrived
    Truncated {
        url: String,
        expected: u64,
        received: u64,
    },
    /// Fetching one asset failed; `what` names it, e.g. "header"
    Fetch {
        what: String,
        cause: Box<ProvisionError>,
    },
}

impl ProvisionError {
    /// HTTP status of the failed request, if the host answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.root_cause() {
            ProvisionError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The innermost error, with asset context stripped.
    pub fn root_cause(&self) -> &ProvisionError {
        match self {
            ProvisionError::Fetch { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

impl std::fmt::Display for ProvisionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionError::UnsupportedPlatform { platform } => {
                write!(
                    f,
                    "Unsupported platform '{}': no OpenTUI library is published for it",
                    platform
                )
            }
            ProvisionError::CreateDir { path, reason } => {
                write!(f, "Failed to create directory {:?}: {}", path, reason)
            }
            ProvisionError::Network { url, reason } => {
                write!(f, "Failed to download {}: {}", url, reason)
            }
            ProvisionError::HttpStatus { status, url } => {
                write!(f, "HTTP {} downloading {}", status, url)
            }
            ProvisionError::Write { path, reason } => {
                write!(f, "Failed to write {:?}: {}", path, reason)
            }
            ProvisionError::Truncated {
                url,
                expected,
                received,
            } => {
                write!(
                    f,
                    "Incomplete download of {}: expected {} bytes, received {}",
                    url, expected, received
                )
            }
            ProvisionError::Fetch { what, cause } => {
                write!(f, "Failed to download {}: {}", what, cause)
            }
        }
    }
}

impl std::error::Error for ProvisionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_display_has_status_and_url() {
        let err = ProvisionError::HttpStatus {
            status: 404,
            url: "https://example.com/latest/download/opentui.h".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("https://example.com/latest/download/opentui.h"));
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_unsupported_platform_display() {
        let err = ProvisionError::UnsupportedPlatform {
            platform: "386-linux".to_string(),
        };
        assert!(err.to_string().contains("386-linux"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_fetch_context_wraps_cause() {
        let err = ProvisionError::Fetch {
            what: "library for x86_64-linux".to_string(),
            cause: Box::new(ProvisionError::HttpStatus {
                status: 404,
                url: "https://example.com/latest/download/libopentui-x86_64-linux.so"
                    .to_string(),
            }),
        };

        assert_eq!(
            err.to_string(),
            "Failed to download library for x86_64-linux: HTTP 404 downloading \
             https://example.com/latest/download/libopentui-x86_64-linux.so"
        );
        assert_eq!(err.status(), Some(404));
        assert!(matches!(
            err.root_cause(),
            ProvisionError::HttpStatus { status: 404, .. }
        ));
    }

    #[test]
    fn test_errors_convert_to_anyhow() {
        let err = anyhow::Error::from(ProvisionError::Truncated {
            url: "u".to_string(),
            expected: 10,
            received: 4,
        });
        assert!(err.downcast_ref::<ProvisionError>().is_some());
        assert!(err.to_string().contains("expected 10 bytes, received 4"));
    }
}
