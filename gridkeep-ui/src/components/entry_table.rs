//! Entry Table Component
//!
//! Grid of stored entries with per-row removal and a clear-all action.

use leptos::*;

use crate::state::global::GlobalState;

/// Entry table component
#[component]
pub fn EntryTable() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <div class="bg-gray-800 rounded-xl p-6 space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-xl font-semibold">
                    {move || format!("Entries ({})", state.entries.with(Vec::len))}
                </h2>
                <button
                    on:click=move |_| state.clear_entries()
                    disabled=move || state.entries.with(Vec::is_empty)
                    class="px-4 py-2 bg-red-600 hover:bg-red-700 disabled:bg-gray-600
                           disabled:cursor-not-allowed rounded-lg text-sm font-medium transition-colors"
                >
                    "Clear all"
                </button>
            </div>

            <table class="w-full text-left">
                <thead class="text-gray-400 text-sm border-b border-gray-700">
                    <tr>
                        <th class="py-2 w-16">"ID"</th>
                        <th class="py-2">"Name"</th>
                        <th class="py-2">"Attributes"</th>
                        <th class="py-2 w-24"></th>
                    </tr>
                </thead>
                <tbody>
                    {move || {
                        let entries = state.entries.get();
                        if entries.is_empty() {
                            return view! {
                                <tr>
                                    <td colspan="4" class="py-6 text-center text-gray-500">
                                        "No entries yet"
                                    </td>
                                </tr>
                            }.into_view();
                        }

                        entries.into_iter().map(|entry| {
                            let id = entry.id;
                            view! {
                                <tr class="border-b border-gray-700 last:border-0">
                                    <td class="py-2 text-gray-400">{id}</td>
                                    <td class="py-2">{entry.name.clone()}</td>
                                    <td class="py-2 space-x-1">
                                        {entry.attribute_labels().into_iter().map(|label| view! {
                                            <span class="px-2 py-0.5 bg-gray-700 rounded text-xs">{label}</span>
                                        }).collect_view()}
                                    </td>
                                    <td class="py-2 text-right">
                                        <button
                                            on:click=move |_| state.remove_entry(id)
                                            class="px-3 py-1 bg-gray-600 hover:bg-gray-500 rounded text-sm"
                                        >
                                            "Remove"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()
                    }}
                </tbody>
            </table>
        </div>
    }
}
