//! User-agent based device classification.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::DeviceType;
use crate::domain::enrichment::DeviceClassifier;

static BOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)bot|crawler|spider|slurp|curl|wget|python-requests|headless")
        .expect("valid bot regex")
});

static TABLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)ipad|tablet|kindle|silk|playbook").expect("valid tablet regex")
});

static ANDROID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)android").expect("valid android regex"));

static MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mobi|iphone|ipod|android|windows phone|blackberry|opera mini")
        .expect("valid mobile regex")
});

static DESKTOP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)windows nt|macintosh|mac os x|x11|linux|cros").expect("valid desktop regex")
});

/// Ordered regex heuristics over the raw user-agent string.
///
/// Rules are checked Bot, Tablet, Mobile, Desktop; the first match wins.
/// Android without a `Mobile` token is a tablet.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicDeviceClassifier;

impl DeviceClassifier for HeuristicDeviceClassifier {
    fn classify(&self, user_agent: Option<&str>) -> DeviceType {
        let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return DeviceType::Unknown;
        };

        if BOT.is_match(ua) {
            DeviceType::Bot
        } else if TABLET.is_match(ua) || (ANDROID.is_match(ua) && !ua.contains("Mobile")) {
            DeviceType::Tablet
        } else if MOBILE.is_match(ua) {
            DeviceType::Mobile
        } else if DESKTOP.is_match(ua) {
            DeviceType::Desktop
        } else {
            DeviceType::Unknown
        }
    }
}
