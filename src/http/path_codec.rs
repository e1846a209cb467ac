//! URI path encoding for generated links

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except RFC 3986 unreserved characters gets percent-encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a URI path segment by segment
///
/// `/` delimiters are kept as-is and a space always becomes `%20`, never `+`.
///
/// # Examples
/// ```
/// use webroot::http::encode_path;
/// assert_eq!(encode_path("/my docs/a&b.txt"), "/my%20docs/a%26b.txt");
/// assert_eq!(encode_path("/ /"), "/%20/");
/// ```
pub fn encode_path(uri: &str) -> String {
    let mut encoded = String::with_capacity(uri.len());
    for (i, token) in uri.split('/').enumerate() {
        if i > 0 {
            encoded.push('/');
        }
        match token {
            "" => {}
            " " => encoded.push_str("%20"),
            _ => encoded.extend(utf8_percent_encode(token, PATH_SEGMENT)),
        }
    }
    encoded
}
