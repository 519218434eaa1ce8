use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Four dot-separated groups of 1-3 digits. Syntactic only: `999.0.0.1` passes.
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}$").expect("static regex")
});

/// Connection settings of one terminal.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeviceConfig {
    pub name: String,
    pub ip: String,
    pub port: u16,
    pub timeout: u32,
    #[serde(default)]
    pub password: String,
    /// JSON capture served by the snapshot driver instead of a live terminal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<String>,
}

impl DeviceConfig {
    pub fn validate(&self) -> AppResult<()> {
        if !IP_PATTERN.is_match(&self.ip) {
            return Err(AppError::Configuration(format!(
                "invalid IP address format: '{}'",
                self.ip
            )));
        }
        if self.port == 0 {
            return Err(AppError::Configuration(
                "port must be a positive integer".into(),
            ));
        }
        if self.timeout == 0 {
            return Err(AppError::Configuration(
                "timeout must be a positive integer".into(),
            ));
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

impl fmt::Debug for DeviceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceConfig")
            .field("name", &self.name)
            .field("ip", &self.ip)
            .field("port", &self.port)
            .field("timeout", &self.timeout)
            .field("password", &"***")
            .field("snapshot", &self.snapshot)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(ip: &str, port: u16, timeout: u32) -> DeviceConfig {
        DeviceConfig {
            name: "test".into(),
            ip: ip.into(),
            port,
            timeout,
            password: "secret".into(),
            snapshot: None,
        }
    }

    #[test]
    fn accepts_dotted_quad() {
        assert!(cfg("192.168.1.201", 4370, 5).validate().is_ok());
        // range is not checked, only the shape
        assert!(cfg("999.999.999.999", 1, 1).validate().is_ok());
    }

    #[test]
    fn rejects_malformed_ip() {
        for ip in ["", "10.0.0", "10.0.0.1.5", "a.b.c.d", "1000.0.0.1", " 10.0.0.1"] {
            assert!(
                matches!(cfg(ip, 4370, 5).validate(), Err(AppError::Configuration(_))),
                "{ip} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_port_and_timeout() {
        assert!(matches!(
            cfg("10.0.0.1", 0, 5).validate(),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            cfg("10.0.0.1", 4370, 0).validate(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn debug_hides_password() {
        let out = format!("{:?}", cfg("10.0.0.1", 4370, 5));
        assert!(!out.contains("secret"));
        assert!(out.contains("***"));
    }
}
