//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use serde::{Deserialize, Serialize};

/// Hostname of a CDN edge server (e.g. `rr3---sn-abc.googlevideo.com`).
///
/// Hosts are compared case-sensitively, exactly as they appear in the
/// request URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Host(String);

impl Host {
    pub fn new(host: impl Into<String>) -> Self {
        Self(host.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this host belongs to the streaming service's edge network.
    ///
    /// An empty suffix matches nothing.
    pub fn has_suffix(&self, domain_suffix: &str) -> bool {
        !domain_suffix.is_empty() && self.0.contains(domain_suffix)
    }
}

impl From<&str> for Host {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::fmt::Display for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pattern identifying a media-segment fetch.
///
/// A URL matches when it contains `<domain_suffix><segment_path>`, for
/// example `googlevideo.com/videoplayback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPattern {
    domain_suffix: String,
    marker: String,
}

impl TargetPattern {
    pub fn new(domain_suffix: impl Into<String>, segment_path: &str) -> Self {
        let domain_suffix = domain_suffix.into();
        let marker = format!("{}{}", domain_suffix, segment_path);
        Self {
            domain_suffix,
            marker,
        }
    }

    pub fn domain_suffix(&self) -> &str {
        &self.domain_suffix
    }

    /// Cheap textual pre-filter run on every observed URL before parsing.
    pub fn matches_url(&self, url: &str) -> bool {
        !self.domain_suffix.is_empty() && url.contains(&self.marker)
    }
}

impl Default for TargetPattern {
    fn default() -> Self {
        Self::new("googlevideo.com", "/videoplayback")
    }
}

/// Connection speed as reported by the player, in kilobits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedReading {
    kbps: u64,
}

impl SpeedReading {
    pub fn from_kbps(kbps: u64) -> Self {
        Self { kbps }
    }

    /// Parse a raw reading such as `"8192 Kbps"` or `"1,000"`.
    ///
    /// Every non-digit character is dropped before parsing, so thousands
    /// separators and units are tolerated. Returns `None` when no digits
    /// remain or the value overflows.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        digits.parse().ok().map(Self::from_kbps)
    }

    pub fn kbps(&self) -> u64 {
        self.kbps
    }

    /// Megabytes per second rendered with two decimals (`kbps / 8 / 1024`).
    ///
    /// Computed on exact integer hundredths; a tie rounds up.
    pub fn mbytes_per_sec(&self) -> String {
        const KBPS_PER_MBYTE: u128 = 8 * 1024;

        let scaled = self.kbps as u128 * 100;
        let mut hundredths = scaled / KBPS_PER_MBYTE;
        if (scaled % KBPS_PER_MBYTE) * 2 >= KBPS_PER_MBYTE {
            hundredths += 1;
        }
        format!("{}.{:02}", hundredths / 100, hundredths % 100)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // ===== Host Tests =====

    #[test]
    fn test_host_suffix_match() {
        let host = Host::new("rr3---sn-abc.googlevideo.com");
        assert!(host.has_suffix("googlevideo.com"));
        assert!(!host.has_suffix("example.com"));
    }

    #[test]
    fn test_host_empty_suffix_matches_nothing() {
        assert!(!Host::new("rr3---sn-abc.googlevideo.com").has_suffix(""));
    }

    #[test]
    fn test_host_display() {
        let host = Host::from("rr1---sn-xyz.googlevideo.com");
        assert_eq!(host.to_string(), "rr1---sn-xyz.googlevideo.com");
        assert_eq!(host.as_str(), "rr1---sn-xyz.googlevideo.com");
    }

    // ===== TargetPattern Tests =====

    #[test]
    fn test_pattern_matches_segment_url() {
        let pattern = TargetPattern::default();
        assert!(pattern.matches_url(
            "https://rr3---sn-abc.googlevideo.com/videoplayback?expire=1&itag=248"
        ));
    }

    #[test]
    fn test_pattern_rejects_other_paths() {
        let pattern = TargetPattern::default();
        assert!(!pattern.matches_url("https://rr3---sn-abc.googlevideo.com/generate_204"));
        assert!(!pattern.matches_url("https://www.youtube.com/youtubei/v1/player"));
    }

    #[test]
    fn test_pattern_custom_suffix() {
        let pattern = TargetPattern::new("127.0.0.1", "/videoplayback");
        assert_eq!(pattern.domain_suffix(), "127.0.0.1");
        assert!(pattern.matches_url("http://127.0.0.1/videoplayback"));
    }

    // ===== SpeedReading Tests =====

    #[test]
    fn test_speed_8192_kbps_is_one_megabyte() {
        assert_eq!(SpeedReading::from_kbps(8192).mbytes_per_sec(), "1.00");
    }

    #[test]
    fn test_speed_1000_kbps_rounds_to_two_decimals() {
        assert_eq!(SpeedReading::from_kbps(1000).mbytes_per_sec(), "0.12");
    }

    #[test]
    fn test_speed_exact_half_rounds_up() {
        let tests = vec![
            (1024, "0.13"),
            (5120, "0.63"),
            (3072, "0.38"),
            (9216, "1.13"),
        ];

        for (kbps, expected) in tests {
            assert_eq!(SpeedReading::from_kbps(kbps).mbytes_per_sec(), expected, "{}", kbps);
        }
    }

    #[test]
    fn test_speed_large_reading() {
        assert_eq!(SpeedReading::from_kbps(819_200).mbytes_per_sec(), "100.00");
        assert!(SpeedReading::from_kbps(u64::MAX).mbytes_per_sec().ends_with(".00"));
    }

    #[test]
    fn test_speed_parse_strips_non_digits() {
        let tests = vec![
            ("8192 Kbps", 8192),
            ("1,000", 1000),
            ("  42\n", 42),
        ];

        for (raw, expected) in tests {
            assert_eq!(SpeedReading::parse(raw).map(|s| s.kbps()), Some(expected));
        }
    }

    #[test]
    fn test_speed_parse_without_digits() {
        assert!(SpeedReading::parse("Kbps").is_none());
        assert!(SpeedReading::parse("").is_none());
    }

    #[test]
    fn test_speed_zero() {
        assert_eq!(SpeedReading::parse("0 Kbps").unwrap().mbytes_per_sec(), "0.00");
    }
}
