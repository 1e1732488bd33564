use yew::prelude::*;

use crate::utils;

#[derive(Properties, PartialEq)]
pub struct Props {
    pub value: String,
    pub placeholder: String,
    pub onchange: Callback<String>,
}

/// Case-insensitive substring matcher used by all the list screens.
pub fn matches(query: &str, haystacks: &[&str]) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    haystacks.iter().any(|h| h.to_lowercase().contains(&q))
}

#[function_component(SearchBar)]
pub fn search_bar(props: &Props) -> Html {
    let onchange = props.onchange.clone();
    let oninput = Callback::from(move |e: InputEvent| {
        onchange.emit(utils::input_value(&e));
    });

    html! {
        <input
            type="search"
            class="form-control search-bar"
            value={props.value.clone()}
            placeholder={props.placeholder.clone()}
            {oninput}
        />
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive_and_trims() {
        assert!(matches("", &["anything"]));
        assert!(matches("  ", &["anything"]));
        assert!(matches("ACME", &["acme corp", "other"]));
        assert!(matches("ntain a", &["Fountain A"]));
        assert!(!matches("zzz", &["Fountain A", "7"]));
    }
}
