use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

/// Value of a `<input type="date">`, e.g. "2024-06-15".
pub fn parse_date_input(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn format_date_input(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

pub fn input_value(e: &Event) -> String {
    e.target()
        .map(|t| t.unchecked_into::<HtmlInputElement>().value())
        .unwrap_or_default()
}

pub fn select_value(e: &Event) -> String {
    e.target()
        .map(|t| t.unchecked_into::<HtmlSelectElement>().value())
        .unwrap_or_default()
}

pub fn textarea_value(e: &Event) -> String {
    e.target()
        .map(|t| t.unchecked_into::<HtmlTextAreaElement>().value())
        .unwrap_or_default()
}

/// Offer `content` as a file download via a transient object URL.
pub fn download_text(filename: &str, content: &str) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(content));
    let blob = web_sys::Blob::new_with_str_sequence(&parts).map_err(js_err)?;
    let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err)?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(js_err)?
        .unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(filename);

    let body = document.body().context("no body")?;
    body.append_child(&anchor).map_err(js_err)?;
    anchor.click();
    let _ = body.remove_child(&anchor);
    let _ = web_sys::Url::revoke_object_url(&url);
    Ok(())
}

fn js_err(value: JsValue) -> anyhow::Error {
    anyhow!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_input_round_trip() {
        let day = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(parse_date_input("2024-06-15"), Some(day));
        assert_eq!(parse_date_input(" 2024-06-15 "), Some(day));
        assert_eq!(parse_date_input(""), None);
        assert_eq!(parse_date_input("15/06/2024"), None);
        assert_eq!(format_date_input(day), "2024-06-15");
    }
}
