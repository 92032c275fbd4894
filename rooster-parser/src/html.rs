use once_cell::sync::Lazy;
use scraper::{Html, Selector};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

/// Collects the `aria-label` of every event tile in a saved week view, in
/// document order. Entities are decoded by the HTML parser.
pub fn extract_labels<S: AsRef<str>>(html: S) -> Vec<String> {
    let html = Html::parse_document(html.as_ref());

    html.select(selector!("div.k-event[aria-label]"))
        .filter_map(|element| element.value().attr("aria-label"))
        .map(str::to_string)
        .collect()
}
