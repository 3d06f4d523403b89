// Share module
// Deep links into an external photo-sharing app and the launcher that opens them

use log::{debug, error, info};
use std::fmt;
use std::process::{Command, Stdio};

/// App that receives saved photos
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareTarget {
    /// Human readable name, used in alerts
    pub name: String,
    /// URL scheme the app registers
    pub scheme: String,
}

impl ShareTarget {
    pub fn new(name: impl Into<String>, scheme: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scheme: scheme.into(),
        }
    }
}

impl Default for ShareTarget {
    fn default() -> Self {
        Self::new("Instagram", "instagram")
    }
}

/// A link asking the target app to open one library asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareUrl {
    scheme: String,
    url: String,
}

impl ShareUrl {
    /// `<scheme>://library?LocalIdentifier=<identifier>`
    pub fn library_asset(target: &ShareTarget, local_identifier: &str) -> Self {
        let url = format!(
            "{}://library?LocalIdentifier={}",
            target.scheme,
            encode_query_value(local_identifier)
        );
        Self {
            scheme: target.scheme.clone(),
            url,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for ShareUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Percent-encode everything except RFC 3986 unreserved characters and `/`
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// OS service that hands URLs to other installed apps
pub trait UrlOpener {
    /// Whether some installed app handles `url`
    fn can_open(&self, url: &ShareUrl) -> bool;

    /// Ask the OS to open `url`; completion is not reported
    fn open(&self, url: &ShareUrl);
}

/// Desktop launcher: xdg-mime answers whether a scheme has a handler,
/// the `open` crate hands the link over
#[derive(Debug, Clone, Default)]
pub struct XdgOpener;

impl XdgOpener {
    pub fn new() -> Self {
        Self
    }
}

impl UrlOpener for XdgOpener {
    fn can_open(&self, url: &ShareUrl) -> bool {
        let mime = format!("x-scheme-handler/{}", url.scheme());
        let output = Command::new("xdg-mime")
            .arg("query")
            .arg("default")
            .arg(&mime)
            .stderr(Stdio::null())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let handler = String::from_utf8_lossy(&output.stdout);
                let handler = handler.trim();
                debug!("Handler for {}: {:?}", mime, handler);
                !handler.is_empty()
            }
            Ok(output) => {
                debug!("xdg-mime exited with {} for {}", output.status, mime);
                false
            }
            Err(e) => {
                debug!("Failed to run xdg-mime: {}", e);
                false
            }
        }
    }

    fn open(&self, url: &ShareUrl) {
        match open::that_detached(url.as_str()) {
            Ok(()) => info!("Opened {}", url),
            Err(e) => error!("Failed to open {}: {}", url, e),
        }
    }
}
