use lopdf::Document;

use super::BoxedError;

/// Extracts the text of every page, in page order, with nothing inserted
/// between pages.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, BoxedError> {
    let document = Document::load_mem(bytes)?;

    let mut text = String::new();
    // `get_pages` is keyed by page number, so iteration is in page order.
    for page_number in document.get_pages().into_keys() {
        let page_text = document.extract_text(&[page_number])?;
        // lopdf terminates every text object with a line feed, which is not
        // part of the page content.
        text.push_str(page_text.strip_suffix('\n').unwrap_or(&page_text));
    }
    Ok(text)
}
