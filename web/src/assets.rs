use std::cell::Cell;
use std::rc::Rc;

use devilwin_core as game;
use gloo::events::EventListener;
use web_sys::HtmlImageElement;
use yew::Callback;

pub(crate) fn window_sprite(frame: u8) -> String {
    format!("assets/window{}.png", frame + 1)
}

pub(crate) fn blast_sprite(frame: u8) -> String {
    format!("assets/blast{}.png", frame + 1)
}

/// Every image the game draws.
pub(crate) fn image_urls(config: &game::GameConfig, catalog: &game::RewardCatalog) -> Vec<String> {
    let windows = (0..config.window_frames).map(window_sprite);
    let blasts = (0..config.blast_frames).map(blast_sprite);
    let rewards = catalog
        .iter()
        .flat_map(|reward| [reward.image.clone(), reward.offer_image.clone()]);
    windows.chain(blasts).chain(rewards).collect()
}

/// Fetches images up front and reports once all of them settled.
///
/// Failed loads count as settled, the renderer skips images that never arrived.
pub(crate) struct Preloader {
    _images: Vec<HtmlImageElement>,
    _listeners: Vec<EventListener>,
}

impl Preloader {
    pub(crate) fn start(urls: Vec<String>, on_ready: Callback<()>) -> Self {
        let total = urls.len();
        if total == 0 {
            on_ready.emit(());
            return Self {
                _images: Vec::new(),
                _listeners: Vec::new(),
            };
        }

        let settled = Rc::new(Cell::new(0usize));
        let mut images = Vec::with_capacity(total);
        let mut listeners = Vec::with_capacity(total * 2);

        for url in urls {
            let image = match HtmlImageElement::new() {
                Ok(image) => image,
                Err(err) => {
                    log::error!("cannot create image for {}: {:?}", url, err);
                    settled.set(settled.get() + 1);
                    continue;
                }
            };

            for event in ["load", "error"] {
                let settled = settled.clone();
                let on_ready = on_ready.clone();
                let url = url.clone();
                listeners.push(EventListener::once(&image, event, move |_| {
                    if event == "error" {
                        log::warn!("failed to load {}", url);
                    }
                    settled.set(settled.get() + 1);
                    log::trace!("{}/{} images settled", settled.get(), total);
                    if settled.get() == total {
                        on_ready.emit(());
                    }
                }));
            }
            image.set_src(&url);
            images.push(image);
        }

        if settled.get() == total {
            on_ready.emit(());
        }

        Self {
            _images: images,
            _listeners: listeners,
        }
    }
}
