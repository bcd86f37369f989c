use devilwin_core::SoundKind;
use web_sys::HtmlAudioElement;

pub(crate) fn sound_url(kind: SoundKind) -> &'static str {
    use SoundKind::*;

    match kind {
        WindowOpen => "assets/sounds/window_open.mp3",
        Blast => "assets/sounds/blast.mp3",
        WrongAnswer => "assets/sounds/wrong.mp3",
        WinLaugh => "assets/sounds/win_laugh.mp3",
        LoseLaugh => "assets/sounds/lose_laugh.mp3",
        Click => "assets/sounds/click.mp3",
    }
}

/// Fire and forget; browsers may refuse playback before the first user gesture.
pub(crate) fn play(kind: SoundKind) {
    let url = sound_url(kind);
    if gloo::utils::document().hidden() {
        log::trace!("document hidden, skipping {}", url);
        return;
    }
    match HtmlAudioElement::new_with_src(url) {
        Ok(audio) => {
            if let Err(err) = audio.play() {
                log::warn!("could not play {}: {:?}", url, err);
            }
        }
        Err(err) => log::error!("could not create audio for {}: {:?}", url, err),
    }
}
