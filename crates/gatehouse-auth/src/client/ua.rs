//! Best-effort User-Agent parsing.
//!
//! Session and traffic records need coarse browser/OS/device families,
//! not full device intelligence. A few substring probes cover the
//! traffic that actually shows up; anything unrecognized stays `Other`.

/// Attributes parsed from a User-Agent header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    /// Browser family, `"Other"` when unrecognized.
    pub browser_family: String,
    /// Browser major version, empty when unknown.
    pub browser_version: String,
    /// Operating system family, `"Other"` when unrecognized.
    pub os_family: String,
    /// Operating system version, empty when unknown.
    pub os_version: String,
    /// `"Desktop"`, `"Mobile"`, `"Tablet"`, `"Bot"`, or `"Other"`.
    pub device_family: String,
}

/// Parse a raw User-Agent header value.
pub fn parse(ua: &str) -> UserAgent {
    let mut parsed = UserAgent {
        browser_family: "Other".to_string(),
        browser_version: String::new(),
        os_family: "Other".to_string(),
        os_version: String::new(),
        device_family: "Other".to_string(),
    };
    if ua.is_empty() {
        return parsed;
    }

    let lower = ua.to_ascii_lowercase();

    // Browser. Chrome UAs carry "Safari/" and Edge UAs carry "Chrome/",
    // so the more specific markers come first.
    if let Some(version) = major_after(ua, "Edg/") {
        parsed.browser_family = "Edge".to_string();
        parsed.browser_version = version;
    } else if let Some(version) = major_after(ua, "OPR/") {
        parsed.browser_family = "Opera".to_string();
        parsed.browser_version = version;
    } else if let Some(version) = major_after(ua, "Firefox/") {
        parsed.browser_family = "Firefox".to_string();
        parsed.browser_version = version;
    } else if let Some(version) = major_after(ua, "Chrome/") {
        parsed.browser_family = "Chrome".to_string();
        parsed.browser_version = version;
    } else if lower.contains("safari/") {
        parsed.browser_family = "Safari".to_string();
        parsed.browser_version = major_after(ua, "Version/").unwrap_or_default();
    }

    // Operating system. Android UAs also contain "Linux" and iOS UAs
    // contain "like Mac OS X", so those checks come first.
    if lower.contains("windows nt") {
        parsed.os_family = "Windows".to_string();
        parsed.os_version = version_after(ua, "Windows NT ").unwrap_or_default();
    } else if lower.contains("android") {
        parsed.os_family = "Android".to_string();
        parsed.os_version = version_after(ua, "Android ").unwrap_or_default();
    } else if lower.contains("iphone os") || lower.contains("ipad; cpu os") {
        parsed.os_family = "iOS".to_string();
        parsed.os_version = version_after(ua, "OS ").unwrap_or_default();
    } else if lower.contains("mac os x") {
        parsed.os_family = "macOS".to_string();
        parsed.os_version = version_after(ua, "Mac OS X ").unwrap_or_default();
    } else if lower.contains("linux") {
        parsed.os_family = "Linux".to_string();
    }

    parsed.device_family = device_family(&lower, &parsed.os_family);
    parsed
}

fn device_family(lower: &str, os_family: &str) -> String {
    const BOT_MARKERS: [&str; 5] = ["bot", "crawler", "spider", "curl", "wget"];

    if BOT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return "Bot".to_string();
    }
    if lower.contains("ipad")
        || lower.contains("tablet")
        || (lower.contains("android") && !lower.contains("mobile"))
    {
        return "Tablet".to_string();
    }
    if lower.contains("mobile") || lower.contains("iphone") {
        return "Mobile".to_string();
    }
    if os_family != "Other" {
        return "Desktop".to_string();
    }
    "Other".to_string()
}

/// Leading integer right after `marker`, e.g. `"126"` from `"Chrome/126.0.0.0"`.
fn major_after(ua: &str, marker: &str) -> Option<String> {
    let rest = &ua[ua.find(marker)? + marker.len()..];
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// Version token right after `marker`, with `_` separators normalized
/// to dots, e.g. `"17.5"` from `"iPhone OS 17_5"`.
fn version_after(ua: &str, marker: &str) -> Option<String> {
    let rest = &ua[ua.find(marker)? + marker.len()..];
    let token: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == '_')
        .collect();
    let normalized = token.replace('_', ".");
    let trimmed = normalized.trim_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";
    const FIREFOX_LINUX: &str =
        "Mozilla/5.0 (X11; Linux x86_64; rv:127.0) Gecko/20100101 Firefox/127.0";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Mobile/15E148 Safari/604.1";
    const EDGE_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.2592.87";
    const ANDROID_PHONE: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str = "Mozilla/5.0 (Linux; Android 13; SM-X200) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Safari/537.36";
    const GOOGLEBOT: &str =
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn test_chrome_on_windows() {
        let parsed = parse(CHROME_WINDOWS);
        assert_eq!(parsed.browser_family, "Chrome");
        assert_eq!(parsed.browser_version, "126");
        assert_eq!(parsed.os_family, "Windows");
        assert_eq!(parsed.os_version, "10.0");
        assert_eq!(parsed.device_family, "Desktop");
    }

    #[test]
    fn test_firefox_on_linux() {
        let parsed = parse(FIREFOX_LINUX);
        assert_eq!(parsed.browser_family, "Firefox");
        assert_eq!(parsed.browser_version, "127");
        assert_eq!(parsed.os_family, "Linux");
        assert_eq!(parsed.device_family, "Desktop");
    }

    #[test]
    fn test_safari_on_iphone() {
        let parsed = parse(SAFARI_IPHONE);
        assert_eq!(parsed.browser_family, "Safari");
        assert_eq!(parsed.browser_version, "17");
        assert_eq!(parsed.os_family, "iOS");
        assert_eq!(parsed.os_version, "17.5");
        assert_eq!(parsed.device_family, "Mobile");
    }

    #[test]
    fn test_edge_beats_chrome_marker() {
        let parsed = parse(EDGE_WINDOWS);
        assert_eq!(parsed.browser_family, "Edge");
        assert_eq!(parsed.browser_version, "126");
    }

    #[test]
    fn test_android_phone_and_tablet() {
        assert_eq!(parse(ANDROID_PHONE).device_family, "Mobile");
        assert_eq!(parse(ANDROID_PHONE).os_family, "Android");
        assert_eq!(parse(ANDROID_TABLET).device_family, "Tablet");
    }

    #[test]
    fn test_bots_and_tools() {
        assert_eq!(parse(GOOGLEBOT).device_family, "Bot");
        assert_eq!(parse("curl/8.4.0").device_family, "Bot");
    }

    #[test]
    fn test_empty_and_garbage() {
        let parsed = parse("");
        assert_eq!(parsed.browser_family, "Other");
        assert_eq!(parsed.device_family, "Other");
        assert_eq!(parse("definitely not a browser").browser_family, "Other");
    }
}
