//! Country Label Table
//!
//! Pure lookup from country code to the label shown next to the speed
//! reading. No I/O, no allocation on the lookup path.

use crate::domain::entities::GeoRecord;

/// Closed set of country codes with a localized label.
const COUNTRY_LABELS: &[(&str, &str)] = &[
    ("HK", "香港"),
    ("CN", "中国"),
    ("TW", "台湾"),
    ("MO", "澳门"),
    ("JP", "日本"),
    ("KR", "韩国"),
    ("SG", "新加坡"),
    ("MY", "马来西亚"),
    ("TH", "泰国"),
    ("VN", "越南"),
    ("ID", "印尼"),
    ("PH", "菲律宾"),
    ("IN", "印度"),
    ("US", "美国"),
    ("CA", "加拿大"),
    ("GB", "英国"),
    ("DE", "德国"),
    ("FR", "法国"),
    ("NL", "荷兰"),
    ("AU", "澳洲"),
    ("RU", "俄罗斯"),
    ("BR", "巴西"),
];

/// Localized label for a country code, if the code is in the table.
///
/// Codes are matched exactly (upper case, as the GeoIP service returns them).
pub fn label_for(code: &str) -> Option<&'static str> {
    COUNTRY_LABELS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
}

/// Text to display for a resolved location.
///
/// Falls back from the mapped label to the raw code, then to the raw
/// country name. Empty fields count as absent.
pub fn display_text(geo: &GeoRecord) -> String {
    if let Some(label) = label_for(&geo.country_code) {
        return label.to_string();
    }
    if !geo.country_code.is_empty() {
        return geo.country_code.clone();
    }
    geo.country_name.clone()
}
