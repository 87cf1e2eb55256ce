//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Device detection (the game needs a physical keyboard)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod storage;

pub use storage::{MemoryStorage, Storage};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Returns true if the user agent belongs to a phone-class device.
///
/// Tablets pass: only Android devices that also advertise "Mobile" count.
pub fn is_mobile(user_agent: &str) -> bool {
    let ua = user_agent.to_lowercase();
    let android = ua.contains("android") && ua.contains("mobile");
    let blackberry = ua.contains("blackberry");
    let ios = ua.contains("iphone") || ua.contains("ipod");
    let opera = ua.contains("opera mini");
    let windows = ua.contains("iemobile") || ua.contains("wpdesktop");
    android || blackberry || ios || opera || windows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_browsers_allowed() {
        assert!(!is_mobile(
            "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
        ));
        assert!(!is_mobile(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 Safari/605.1.15"
        ));
    }

    #[test]
    fn test_phones_rejected() {
        assert!(is_mobile(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 17_5 like Mac OS X) AppleWebKit/605.1.15 Mobile/15E148"
        ));
        assert!(is_mobile(
            "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/126.0 Mobile Safari/537.36"
        ));
        assert!(is_mobile("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80) Presto/2.5.25"));
        assert!(is_mobile("Mozilla/5.0 (compatible; MSIE 10.0; Windows Phone 8.0; IEMobile/10.0)"));
        assert!(is_mobile("BlackBerry9700/5.0.0.351 Profile/MIDP-2.1"));
    }

    #[test]
    fn test_android_tablet_allowed() {
        assert!(!is_mobile(
            "Mozilla/5.0 (Linux; Android 13; SM-X710) AppleWebKit/537.36 Chrome/126.0 Safari/537.36"
        ));
    }
}
