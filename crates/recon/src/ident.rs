//! Content identifier extraction from platform URLs.

const VIDEO_SEGMENT: &str = "/video/";

/// Extract the platform-assigned content id from a content URL: the maximal
/// run of decimal digits immediately after the `/video/` path segment.
/// Globally unique per platform, so it is the highest-confidence match key.
pub fn extract(url: &str) -> Option<String> {
    let start = url.find(VIDEO_SEGMENT)? + VIDEO_SEGMENT.len();
    let digits: String = url[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        None
    } else {
        Some(digits)
    }
}
