use bitflags::bitflags;
use yew::prelude::*;

bitflags! {
    /// `MouseEvent.buttons` mask.
    #[derive(Copy, Clone, Debug, PartialEq)]
    pub(crate) struct MouseButtons: u16 {
        const LEFT = 1;
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct ModalProps {
    #[prop_or_default]
    pub children: Html,
}

/// Renders its children into `document.body`, above the game layer.
#[function_component]
pub(crate) fn Modal(props: &ModalProps) -> Html {
    let modal_host = gloo::utils::body();
    create_portal(props.children.clone(), modal_host.into())
}

/// Seed for a new layout from two 32-bit draws of `Math.random`.
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;

    let half = || (random() * f64::from(u32::MAX)) as u64;
    (half() << 32) | half()
}

/// Inner size of the browser window, zero when unknown.
pub(crate) fn viewport_size() -> (f64, f64) {
    let window = gloo::utils::window();
    let width = window.inner_width().ok().and_then(|v| v.as_f64());
    let height = window.inner_height().ok().and_then(|v| v.as_f64());
    (width.unwrap_or(0.0), height.unwrap_or(0.0))
}
