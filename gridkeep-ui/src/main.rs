//! Gridkeep Front-end
//!
//! Entry grid built with Leptos (WASM).
//!
//! # Features
//!
//! - Add entries with free-form attributes
//! - Remove single entries or clear the grid after confirmation
//! - Entries survive reloads through `localStorage`
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All state lives in one `PersistentList` over the browser's
//! `localStorage`; there is no server.

use leptos::*;

mod app;
mod components;
mod state;
mod storage;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
