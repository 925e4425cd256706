//! Human-readable names for product URLs

/// Derive a display name from the last path segment of a product URL.
///
/// `https://www.microcenter.com/product/123/usb-c-hub-9-port` becomes
/// `Usb C Hub 9 Port`. Query strings and fragments are ignored, and a
/// trailing slash does not produce an empty name.
pub fn display_name(product_url: &str) -> String {
    let path = product_url
        .split(['?', '#'])
        .next()
        .unwrap_or(product_url);
    let slug = path
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or(path);
    title_case(&slug.replace('-', " "))
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = false;
        }
    }
    out
}
