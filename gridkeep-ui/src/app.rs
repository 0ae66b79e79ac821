//! App Root Component
//!
//! Main application component with the global provider.

use leptos::*;

use crate::components::{EntryForm, EntryTable};
use crate::state::global::{provide_global_state, GlobalState};

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Load entries and provide global state to all components
    provide_global_state();

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700">
                <div class="container mx-auto px-4 h-16 flex items-center">
                    <span class="text-xl font-bold">"Gridkeep"</span>
                </div>
            </header>

            <main class="flex-1 container mx-auto px-4 py-8 pb-24 space-y-6">
                <EntryForm />
                <EntryTable />
            </main>

            <Footer />
        </div>
    }
}

/// Footer showing when the entries last changed
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto text-sm text-gray-400">
                {move || {
                    state.updated_at.get()
                        .map(|at| format!("Last updated: {}", at))
                        .unwrap_or_else(|| "No changes this session".to_string())
                }}
            </div>
        </footer>
    }
}
