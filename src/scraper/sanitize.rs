//! Removes the per-request values the CDN injects into every page load.
//!
//! Three spots change on every download even when the documentation itself
//! has not: an obfuscated e-mail attribute in one parameter description, the
//! obfuscated "Contact us" link in the footer, and an inline script at the
//! very end of the page. They are cut out in that order, each stage
//! searching only what the previous stage left over.

use crate::error::SanitizeError;

const CFEMAIL_ATTR: &str = "data-cfemail=";
const CONTACT_LINK: &str = "<a href=\"/cdn-cgi/l/email-protection#";
const CONTACT_TEXT: &str = "Contact us";
const LIST_ITEM_END: &str = "</li>";
const SCRIPT_START: &str = "<script ";

pub fn sanitize(raw: &[u8]) -> Result<Vec<u8>, SanitizeError> {
    let mut canonical = Vec::with_capacity(raw.len());

    // <a href="/cdn-cgi/l/email-protection" class="__cf_email__" data-cfemail="b3c0...">[email&#160;protected]</a>
    let rest = excise_email_attribute(raw, &mut canonical)?;
    // <a href="/cdn-cgi/l/email-protection#295a...">Contact us</a></li>
    let rest = excise_contact_link(rest, &mut canonical)?;
    // <script data-cfasync="false" src="..."></script><script>...</script>
    let rest = excise_trailing_script(rest, &mut canonical)?;

    canonical.extend_from_slice(rest);
    Ok(canonical)
}

fn excise_email_attribute<'a>(
    doc: &'a [u8],
    out: &mut Vec<u8>,
) -> Result<&'a [u8], SanitizeError> {
    let start = find_marker(doc, CFEMAIL_ATTR, "email attribute")?;
    // drop the space separating the attribute from the previous one
    out.extend_from_slice(&doc[..start.saturating_sub(1)]);

    let rest = &doc[start..];
    let close = find_marker(rest, ">", "email attribute")?;
    Ok(&rest[close..])
}

fn excise_contact_link<'a>(doc: &'a [u8], out: &mut Vec<u8>) -> Result<&'a [u8], SanitizeError> {
    let start = find_marker(doc, CONTACT_LINK, "contact link")?;
    out.extend_from_slice(&doc[..start]);
    out.extend_from_slice(CONTACT_TEXT.as_bytes());

    let rest = &doc[start..];
    let end = find_marker(rest, LIST_ITEM_END, "contact link")?;
    Ok(&rest[end..])
}

fn excise_trailing_script<'a>(
    doc: &'a [u8],
    out: &mut Vec<u8>,
) -> Result<&'a [u8], SanitizeError> {
    let start = find_marker(doc, SCRIPT_START, "trailing script")?;
    out.extend_from_slice(&doc[..start.saturating_sub(1)]);

    let rest = &doc[start..];
    let line_end = find_bytes(rest, b"\n").map_or(rest.len(), |newline| newline + 1);
    Ok(&rest[line_end..])
}

fn find_marker(
    haystack: &[u8],
    marker: &'static str,
    stage: &'static str,
) -> Result<usize, SanitizeError> {
    find_bytes(haystack, marker.as_bytes()).ok_or(SanitizeError::MissingMarker { stage, marker })
}

fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(email_token: &str, contact_token: &str, script_token: &str) -> String {
        format!(
            "<html><body>\n\
             <p>Contact <a href=\"/cdn-cgi/l/email-protection\" class=\"__cf_email__\" data-cfemail=\"{email_token}\">[email&#160;protected]</a></p>\n\
             <ul><li><a href=\"/cdn-cgi/l/email-protection#{contact_token}\">Contact us</a></li></ul>\n\
             </body>\n\
             <script data-cfasync=\"false\" src=\"/cdn-cgi/{script_token}.js\"></script><script>window.x='{script_token}'</script>\n\
             </html>\n"
        )
    }

    #[test]
    fn volatile_values_do_not_change_the_canonical_form() {
        let first = sanitize(page("b3c0c6", "295a5c", "aaa111").as_bytes()).unwrap();
        let second = sanitize(page("77ffee", "0101ab", "zzz999").as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn keeps_surrounding_markup() {
        let canonical = sanitize(page("b3c0c6", "295a5c", "aaa111").as_bytes()).unwrap();
        let text = String::from_utf8(canonical).unwrap();

        assert!(text.contains("class=\"__cf_email__\">[email&#160;protected]</a>"));
        assert!(text.contains("<ul><li>Contact us</li></ul>"));
        assert!(text.ends_with("</body></html>\n"));
        assert!(!text.contains("cdn-cgi/l/email-protection#"));
        assert!(!text.contains("<script"));
    }

    #[test]
    fn script_without_trailing_newline_is_dropped_to_the_end() {
        let raw = "<i data-cfemail=\"1\">x</i><li><a href=\"/cdn-cgi/l/email-protection#2\">Contact us</a></li>\n<script src=\"x\"></script>";
        let canonical = sanitize(raw.as_bytes()).unwrap();
        assert_eq!(
            String::from_utf8(canonical).unwrap(),
            "<i>x</i><li>Contact us</li>"
        );
    }

    #[test]
    fn missing_email_attribute_is_fatal() {
        let raw = page("b3c0c6", "295a5c", "aaa111").replace("data-cfemail", "data-mail");
        let err = sanitize(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SanitizeError::MissingMarker {
                marker: CFEMAIL_ATTR,
                ..
            }
        ));
    }

    #[test]
    fn missing_contact_link_is_fatal() {
        let raw = page("b3c0c6", "295a5c", "aaa111").replace("email-protection#", "contact#");
        let err = sanitize(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SanitizeError::MissingMarker {
                marker: CONTACT_LINK,
                ..
            }
        ));
    }

    #[test]
    fn contact_link_without_closing_list_item_is_fatal() {
        let raw = page("b3c0c6", "295a5c", "aaa111")
            .replace("Contact us</a></li>", "Contact us</a></div>");
        let err = sanitize(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SanitizeError::MissingMarker {
                stage: "contact link",
                marker: LIST_ITEM_END,
            }
        ));
    }

    #[test]
    fn markers_out_of_order_are_fatal() {
        // the script comes before the footer link, so stage three has nothing left to find
        let raw = "<script x></script>\n<i data-cfemail=\"1\">x</i><li><a href=\"/cdn-cgi/l/email-protection#2\">Contact us</a></li>";
        let err = sanitize(raw.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SanitizeError::MissingMarker {
                marker: SCRIPT_START,
                ..
            }
        ));
    }
}
