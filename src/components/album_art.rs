use dioxus::prelude::*;

const FALLBACK_ART: Asset = asset!("/assets/album-placeholder.svg");

/// The URL to render, or `None` for the placeholder. Only the exact URL that
/// failed is skipped, so a new track gets a fresh attempt.
fn art_to_show(src: Option<String>, failed: Option<&str>) -> Option<String> {
    src.filter(|url| failed != Some(url.as_str()))
}

/// Album art that swaps in a local placeholder when there is no URL or the
/// image fails to load. A new URL gets a fresh attempt.
#[component]
pub fn AlbumArt(
    #[props(!optional)] src: Option<String>,
    #[props(default = "Album art".to_string())] alt: String,
) -> Element {
    let mut failed_src = use_signal(|| None::<String>);

    let url = art_to_show(src, failed_src.read().as_deref());

    match url {
        Some(url) => {
            let failing = url.clone();
            rsx! {
                img {
                    src: "{url}",
                    alt: "{alt}",
                    onerror: move |_| {
                        tracing::warn!("album art failed to load: {failing}");
                        failed_src.set(Some(failing.clone()));
                    },
                }
            }
        }
        None => rsx! {
            img { src: FALLBACK_ART, alt: "{alt}" }
        },
    }
}
