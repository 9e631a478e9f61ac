//! Platform information for the client identifier header.
//!
//! The `User-Agent` sent with every request has the form
//! `FlickrFeed/<sdk version> <os>/<os version> Device/<model>`. It is for
//! diagnostics only. The OS and device tokens come from a [`PlatformInfo`]
//! implementation so the rest of the client never inspects the target
//! platform itself.

/// Client SDK version reported in the identifier.
pub const SDK_VERSION: &str = "1.0";

/// Client name reported in the identifier.
pub const CLIENT_NAME: &str = "FlickrFeed";

/// Source of the OS and device tokens.
pub trait PlatformInfo: Send + Sync {
    /// OS token, e.g. `Linux/6.8.0` or `macOS/14.4.1`.
    fn os_token(&self) -> String;

    /// Device model token, e.g. `x86_64` or `arm64`.
    fn device_model(&self) -> String;
}

/// Build the client identifier for the given platform.
#[must_use]
pub fn build_user_agent(platform: &dyn PlatformInfo) -> String {
    format!(
        "{CLIENT_NAME}/{SDK_VERSION} {} Device/{}",
        platform.os_token(),
        platform.device_model()
    )
}

/// Platform information read from the running system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlatform;

impl PlatformInfo for SystemPlatform {
    fn os_token(&self) -> String {
        format!("{}/{}", os_name(), os_version())
    }

    fn device_model(&self) -> String {
        std::env::consts::ARCH.to_string()
    }
}

fn os_name() -> &'static str {
    match std::env::consts::OS {
        "linux" => "Linux",
        "macos" => "macOS",
        "windows" => "Windows",
        "ios" => "iOS",
        "android" => "Android",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

fn os_version() -> String {
    // Only Linux exposes this file; elsewhere the version is reported as unknown.
    std::fs::read_to_string("/proc/sys/kernel/osrelease")
        .ok()
        .map(|release| release.trim().to_string())
        .filter(|release| !release.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Fixed platform tokens, for reproducible identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPlatform {
    os: String,
    device: String,
}

impl FixedPlatform {
    #[must_use]
    pub fn new(os: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            device: device.into(),
        }
    }
}

impl PlatformInfo for FixedPlatform {
    fn os_token(&self) -> String {
        self.os.clone()
    }

    fn device_model(&self) -> String {
        self.device.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_from_fixed_platform() {
        let platform = FixedPlatform::new("iOS/17.2", "iPhone15,2");
        assert_eq!(
            build_user_agent(&platform),
            "FlickrFeed/1.0 iOS/17.2 Device/iPhone15,2"
        );
    }

    #[test]
    fn system_platform_tokens_are_not_empty() {
        let platform = SystemPlatform;
        let os = platform.os_token();
        assert!(os.contains('/'), "{os}");
        assert!(!platform.device_model().is_empty());
        assert!(build_user_agent(&platform).starts_with("FlickrFeed/1.0 "));
    }
}
