use crate::assets::{self, Preloader};
use crate::audio;
use crate::config::GameFile;
use crate::utils::*;
use clap::Args;
use devilwin_core as game;
use game::{Button, CellState, GameState};
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use web_time::Instant;
use yew::prelude::*;

/// How often the virtual clock catches up with the wall clock.
const TICK_MS: u32 = 50;

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    left: f64,
    top: f64,
    size: f64,
    state: CellState,
    window: Option<AttrValue>,
    blast: Option<AttrValue>,
    reward: Option<AttrValue>,
}

#[function_component]
fn CellView(props: &CellProps) -> Html {
    let CellProps {
        left,
        top,
        size,
        state,
        window,
        blast,
        reward,
    } = props;

    let class = classes!(
        "cell",
        match state {
            CellState::Closed => "closed",
            CellState::Opening => "opening",
            CellState::Open => "open",
            CellState::Closing => "closing",
            CellState::Blasting => "blasting",
            CellState::Completed => "completed",
        },
        (reward.is_none() && *state == CellState::Completed).then_some("wrong"),
    );
    let style = format!("left:{left}px;top:{top}px;width:{size}px;height:{size}px");

    html! {
        <div {class} {style}>
            if let Some(src) = reward.clone() {
                <img class="reward" {src} draggable="false"/>
            }
            if let Some(src) = window.clone() {
                <img class="window" {src} draggable="false"/>
            }
            if let Some(src) = blast.clone() {
                <img class="blast" {src} draggable="false"/>
            }
        </div>
    }
}

/// Whether an effect changes anything on screen; sounds and outbound links do not.
fn needs_redraw(effect: game::Effect) -> bool {
    use game::Effect::*;

    match effect {
        Draw(_) | ShowRewardPopup(_) | Screen(_) | Countdown(_) | RevealSeconds(_) | Hud { .. } => {
            true
        }
        Sound(_) | VisitBrand => false,
    }
}

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) enum Msg {
    Tick,
    AssetsReady,
    Pointer { x: f64, y: f64 },
    Press(Button),
    Resize,
}

pub(crate) struct GameView {
    machine: Option<game::GameMachine>,
    error: Option<String>,
    brand_link: String,
    popup: Option<game::Reward>,
    assets_loaded: bool,
    started: Instant,
    _preloader: Option<Preloader>,
    _timer_interval: Interval,
    _resize_listener: EventListener,
}

impl GameView {
    fn create_timer(ctx: &Context<Self>) -> Interval {
        let link = ctx.link().clone();
        Interval::new(TICK_MS, move || link.send_message(Msg::Tick))
    }

    fn create_resize_listener(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "resize", move |_| {
            link.send_message(Msg::Resize)
        })
    }

    fn load(seed: u64) -> anyhow::Result<(game::GameMachine, String)> {
        let (file, catalog) = GameFile::load()?;
        let mut machine = game::GameMachine::new(file.game, catalog, seed)?;
        let (width, height) = viewport_size();
        machine.resize(width, height);
        Ok((machine, file.brand_link))
    }

    /// Hands queued effects to the browser; true when the view has to be redrawn.
    fn apply_effects(&mut self) -> bool {
        let Self {
            machine,
            popup,
            brand_link,
            ..
        } = self;
        let Some(machine) = machine.as_mut() else {
            return false;
        };

        let mut redraw = false;
        for effect in machine.drain_effects() {
            redraw |= needs_redraw(effect);
            match effect {
                game::Effect::Sound(kind) => audio::play(kind),
                game::Effect::ShowRewardPopup(id) => {
                    *popup = machine.catalog().get(id).cloned();
                    if popup.is_none() {
                        log::error!("reward {} missing from catalog", id);
                    }
                }
                game::Effect::Screen(state) => {
                    log::debug!("screen: {:?}", state);
                    if state != GameState::Popup {
                        *popup = None;
                    }
                }
                game::Effect::VisitBrand => {
                    let window = gloo::utils::window();
                    if let Err(err) = window.open_with_url_and_target(brand_link.as_str(), "_blank") {
                        log::error!("could not open {}: {:?}", brand_link, err);
                    }
                }
                game::Effect::Draw(coords) => log::trace!("draw {:?}", coords),
                game::Effect::Countdown(n) => log::trace!("countdown {}", n),
                game::Effect::RevealSeconds(n) => log::trace!("reveal {}", n),
                game::Effect::Hud { lives, found } => {
                    log::debug!("lives {}, found {}", lives, found)
                }
            }
        }
        redraw
    }

    fn view_cells(&self, machine: &game::GameMachine) -> Html {
        let geometry = machine.geometry();
        let catalog = machine.catalog();
        let rewards_visible = machine.rewards_visible();

        html! {
            <>
                {
                    for machine.grid().iter().map(|cell| {
                        let (left, top) = geometry.cell_origin(cell.coords());
                        let state = cell.state();
                        let window = matches!(
                            state,
                            CellState::Closed | CellState::Opening | CellState::Open | CellState::Closing
                        )
                        .then(|| AttrValue::from(assets::window_sprite(cell.frame())));
                        let blast = (state == CellState::Blasting)
                            .then(|| AttrValue::from(assets::blast_sprite(cell.blast_frame())));
                        let show_reward = rewards_visible
                            || matches!(state, CellState::Open | CellState::Blasting | CellState::Completed);
                        let reward = cell
                            .reward()
                            .filter(|_| show_reward)
                            .and_then(|id| catalog.get(id))
                            .map(|reward| AttrValue::from(reward.image.clone()));
                        html! {
                            <CellView {left} {top} size={geometry.cell_size} {state} {window} {blast} {reward}/>
                        }
                    })
                }
            </>
        }
    }

    fn view_overlay(&self, ctx: &Context<Self>, machine: &game::GameMachine) -> Html {
        let press = |button: Button| {
            ctx.link().callback(move |e: MouseEvent| {
                e.stop_propagation();
                Msg::Press(button)
            })
        };
        let session = machine.session();
        let hud = html! {
            <nav class="hud">
                <aside class="lives">{("♥".repeat(session.lives_remaining().into()))}</aside>
                <aside class="found">{format!("{}/{}", session.rewards_found(), session.target())}</aside>
            </nav>
        };

        match machine.state() {
            GameState::Title => html! {
                <div class="panel title">
                    <h1>{"Devil Windows"}</h1>
                    if self.assets_loaded {
                        <p>{"Tap to play"}</p>
                    } else {
                        <p>{"Loading…"}</p>
                    }
                </div>
            },
            GameState::Instructions1 => html! {
                <div class="panel instructions">
                    <p>{"Every window hides a prize or nothing at all. Watch closely while they are open."}</p>
                    <button onmousedown={press(Button::Start)}>{"Start"}</button>
                </div>
            },
            GameState::CountdownOpen => html! {
                <>
                    if machine.countdown_value() > 0 {
                        <div class="countdown">{machine.countdown_value()}</div>
                    }
                </>
            },
            GameState::RevealTimer => html! {
                <div class="countdown reveal">{machine.reveal_seconds_remaining()}</div>
            },
            GameState::CloseAll => html! {},
            GameState::Instructions2 => html! {
                <div class="panel instructions">
                    <p>{"Now open the windows that hid a prize. Every empty window costs a life."}</p>
                    <button onmousedown={press(Button::Understood)}>{"Understood"}</button>
                </div>
            },
            GameState::Playing => hud,
            GameState::Popup => html! {
                <>
                    {hud}
                    if let Some(reward) = &self.popup {
                        <Modal>
                            <div class="popup">
                                <a href={reward.link.clone()} target="_blank">
                                    <img src={reward.offer_image.clone()}/>
                                </a>
                                <button onmousedown={press(Button::DismissPopup)}>{"Close"}</button>
                            </div>
                        </Modal>
                    }
                </>
            },
            GameState::Win => html! {
                <div class="panel win">
                    <h1>{"You found them all!"}</h1>
                    <button onmousedown={press(Button::PlayAgain)}>{"Play again"}</button>
                    <button onmousedown={press(Button::VisitBrand)}>{"Visit us"}</button>
                </div>
            },
            GameState::Lose => html! {
                <div class="panel lose">
                    <h1>{"Out of lives"}</h1>
                    <button onmousedown={press(Button::PlayAgain)}>{"Play again"}</button>
                </div>
            },
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed.unwrap_or_else(js_random_seed);
        log::info!("seed: {}", seed);

        let (machine, brand_link, error) = match Self::load(seed) {
            Ok((machine, brand_link)) => (Some(machine), brand_link, None),
            Err(err) => {
                log::error!("{:#}", err);
                (None, String::new(), Some(format!("{:#}", err)))
            }
        };
        let preloader = machine.as_ref().map(|machine| {
            let urls = assets::image_urls(machine.config(), machine.catalog());
            Preloader::start(urls, ctx.link().callback(|_| Msg::AssetsReady))
        });

        Self {
            machine,
            error,
            brand_link,
            popup: None,
            assets_loaded: false,
            started: Instant::now(),
            _preloader: preloader,
            _timer_interval: GameView::create_timer(ctx),
            _resize_listener: GameView::create_resize_listener(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let Some(machine) = self.machine.as_mut() else {
            return false;
        };

        let forced = match msg {
            Tick => {
                let now = self.started.elapsed().as_millis() as game::Millis;
                machine.advance_to(now);
                false
            }
            AssetsReady => {
                self.assets_loaded = true;
                machine.assets_ready();
                true
            }
            Pointer { x, y } => {
                let outcome = machine.pointer_click(x, y);
                log::trace!("pointer ({}, {}): {:?}", x, y, outcome);
                outcome.has_update()
            }
            Press(button) => machine.press(button).has_update(),
            Resize => {
                let (width, height) = viewport_size();
                machine.resize(width, height);
                true
            }
        };

        self.apply_effects() || forced
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let Some(machine) = &self.machine else {
            return html! {
                <div class="devilwin error">{self.error.clone().unwrap_or_default()}</div>
            };
        };

        let onmousedown = ctx.link().batch_callback(|e: MouseEvent| {
            let buttons = MouseButtons::from_bits_truncate(e.buttons());
            (buttons == MouseButtons::LEFT).then(|| Msg::Pointer {
                x: e.client_x().into(),
                y: e.client_y().into(),
            })
        });

        html! {
            <div class="devilwin" {onmousedown} oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                if machine.state() != GameState::Title {
                    {self.view_cells(machine)}
                }
                {self.view_overlay(ctx, machine)}
            </div>
        }
    }
}
