use dioxus::prelude::*;

mod api;
mod components;
mod config;
mod diagnostics;
mod metadata;
mod playback;
mod sync;
mod utils;

use components::AppShell;

const APP_CSS: Asset = asset!("/assets/styling/app.css");

fn main() {
    dioxus::logger::init(config::get().log_level()).expect("failed to init logger");
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }
        document::Stylesheet { href: APP_CSS }

        AppShell {}
    }
}
