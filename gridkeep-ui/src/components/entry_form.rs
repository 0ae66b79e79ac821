//! Entry Form Component
//!
//! Form for adding a new entry.

use leptos::*;

use crate::state::global::GlobalState;

/// Split a comma-separated attribute field, dropping blanks
pub fn parse_attributes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Entry form component
#[component]
pub fn EntryForm() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let (name, set_name) = create_signal(String::new());
    let (attributes, set_attributes) = create_signal(String::new());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();

        state.add_entry(&name.get(), parse_attributes(&attributes.get()));
        set_name.set(String::new());
        set_attributes.set(String::new());
    };

    view! {
        <form on:submit=on_submit class="flex flex-wrap gap-2">
            <input
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| set_name.set(event_target_value(&ev))
                class="flex-1 bg-gray-700 rounded-lg px-4 py-2
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <input
                type="text"
                placeholder="Attributes, comma separated"
                prop:value=move || attributes.get()
                on:input=move |ev| set_attributes.set(event_target_value(&ev))
                class="flex-1 bg-gray-700 rounded-lg px-4 py-2
                       border border-gray-600 focus:border-primary-500 focus:outline-none"
            />
            <button
                type="submit"
                disabled=move || name.get().trim().is_empty()
                class="px-4 py-2 bg-primary-600 hover:bg-primary-700 disabled:bg-gray-600
                       disabled:cursor-not-allowed rounded-lg font-medium transition-colors"
            >
                "Add"
            </button>
        </form>
    }
}
