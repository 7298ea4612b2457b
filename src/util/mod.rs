use wasm_bindgen::JsCast;

/// Download filename for a PDF export: whitespace runs become underscores,
/// a blank title falls back to "screenplay".
pub(crate) fn pdf_download_name(title: &str) -> String {
    let stem: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    if stem.is_empty() {
        "screenplay.pdf".to_string()
    } else {
        format!("{}.pdf", stem)
    }
}

/// Hand a byte buffer to the browser as a file download.
///
/// Blob -> object URL -> synthetic anchor click -> revoke. Best effort: a
/// missing document just drops the download.
pub(crate) fn trigger_file_download(bytes: &[u8], filename: &str) {
    let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array.buffer());

    let Ok(blob) = web_sys::Blob::new_with_u8_array_sequence(&parts) else {
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        return;
    };

    if let Ok(el) = doc.create_element("a") {
        if let Ok(anchor) = el.dyn_into::<web_sys::HtmlAnchorElement>() {
            anchor.set_href(&url);
            anchor.set_download(filename);
            if let Some(body) = doc.body() {
                let _ = body.append_child(&anchor);
                anchor.click();
                anchor.remove();
            }
        }
    }

    let _ = web_sys::Url::revoke_object_url(&url);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_download_name_replaces_whitespace() {
        assert_eq!(pdf_download_name("Opening Night"), "Opening_Night.pdf");
        assert_eq!(pdf_download_name("A  Long\tTitle"), "A_Long_Title.pdf");
    }

    #[test]
    fn test_pdf_download_name_blank_falls_back() {
        assert_eq!(pdf_download_name(""), "screenplay.pdf");
        assert_eq!(pdf_download_name("   "), "screenplay.pdf");
    }

    #[test]
    fn test_pdf_download_name_plain_title() {
        assert_eq!(pdf_download_name("Untitled"), "Untitled.pdf");
    }
}
