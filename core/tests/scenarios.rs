use std::collections::BTreeSet;

use devilwin_core::*;

fn catalog(count: RewardId) -> RewardCatalog {
    let rewards = (1..=count)
        .map(|id| Reward {
            id,
            image: format!("assets/D{id}.png"),
            offer_image: format!("assets/offer{id}.png"),
            link: format!("https://example.com/offer{id}"),
        })
        .collect();
    RewardCatalog::new(rewards).unwrap()
}

/// A machine waiting for the first cell click.
fn playing(seed: u64) -> GameMachine {
    let mut machine = GameMachine::new(GameConfig::default(), catalog(10), seed).unwrap();
    machine.assets_ready();
    machine.intent_to_play();
    machine.press(Button::Start);
    machine.advance_by(60_000);
    assert_eq!(machine.press(Button::Understood), ClickOutcome::Advanced);
    assert_eq!(machine.state(), GameState::Playing);
    machine
}

fn count_screens(effects: &[Effect], state: GameState) -> usize {
    effects
        .iter()
        .filter(|&&effect| effect == Effect::Screen(state))
        .count()
}

/// Replays the layout by hand: the state the first deciding click leads to, and how many
/// clicks it takes.
fn expected_verdict(grid: &Grid, lives: u8, target: CellCount) -> (GameState, usize) {
    let (mut found, mut wrong) = (0, 0);
    for (clicks, coords) in iter_coords(grid.size()).enumerate() {
        if grid[coords].has_reward() {
            found += 1;
            if found == target {
                return (GameState::Win, clicks + 1);
            }
        } else {
            wrong += 1;
            if wrong == lives {
                return (GameState::Lose, clicks + 1);
            }
        }
    }
    unreachable!("a full grid always decides the game")
}

#[test]
fn fresh_grid_is_closed() {
    let machine = GameMachine::new(GameConfig::default(), catalog(10), 5).unwrap();

    assert_eq!(machine.grid().total_cells(), 20);
    for cell in machine.grid().iter() {
        assert_eq!(cell.state(), CellState::Closed);
        assert_eq!(cell.frame(), 0);
    }
}

#[test]
fn placement_is_unique_for_every_seed() {
    for seed in 0..100 {
        let machine = GameMachine::new(GameConfig::default(), catalog(30), seed).unwrap();

        let cells: Vec<_> = machine.grid().iter().filter(|c| c.has_reward()).collect();
        let ids: BTreeSet<_> = cells.iter().filter_map(|c| c.reward()).collect();
        let coords: BTreeSet<_> = cells.iter().map(|c| c.coords()).collect();

        assert_eq!(cells.len(), 10);
        assert_eq!(ids.len(), 10);
        assert_eq!(coords.len(), 10);
    }
}

#[test]
fn exhausted_catalog_is_rejected_at_setup() {
    assert_eq!(
        GameMachine::new(GameConfig::default(), catalog(9), 0).err(),
        Some(GameError::RewardCatalogExhausted {
            available: 9,
            required: 10
        })
    );
}

#[test]
fn row_major_playthrough_ends_exactly_once() {
    for seed in 0..32 {
        let mut machine = playing(seed);
        let (verdict, deciding_clicks) = expected_verdict(machine.grid(), 3, 10);
        let mut effects = machine.drain_effects();
        let mut opened = 0;

        for coords in iter_coords((5, 4)) {
            if machine.cell_clicked(coords) == ClickOutcome::Opening {
                opened += 1;
            }
            machine.advance_by(5_000);
            if machine.state() == GameState::Popup {
                machine.press(Button::DismissPopup);
            }
            effects.extend(machine.drain_effects());
        }

        assert_eq!(machine.state(), verdict, "seed {seed}");
        assert_eq!(opened, deciding_clicks, "seed {seed}");
        assert_eq!(
            machine.grid().count_in_state(CellState::Completed) as usize,
            deciding_clicks
        );
        assert_eq!(
            count_screens(&effects, GameState::Win) + count_screens(&effects, GameState::Lose),
            1
        );

        let session = machine.session();
        match verdict {
            GameState::Win => {
                assert_eq!(session.rewards_found(), 10);
                assert!(session.lives_remaining() > 0);
            }
            _ => {
                assert_eq!(session.lives_remaining(), 0);
                assert!(session.rewards_found() < 10);
            }
        }
    }
}

#[test]
fn lose_decided_first_is_never_overturned() {
    let mut machine = playing(9);

    for coords in iter_coords((5, 4)) {
        assert_eq!(machine.cell_clicked(coords), ClickOutcome::Opening);
    }
    machine.advance_by(60_000);
    let effects = machine.drain_effects();

    assert_eq!(machine.state(), GameState::Lose);
    assert_eq!(machine.session().rewards_found(), 10);
    assert_eq!(machine.session().lives_remaining(), 0);
    assert_eq!(count_screens(&effects, GameState::Win), 0);
    assert_eq!(count_screens(&effects, GameState::Lose), 1);
    assert!(!effects.iter().any(|e| matches!(e, Effect::ShowRewardPopup(_))));
}

#[test]
fn every_found_reward_blasts_once() {
    let mut machine = playing(3);
    let rewards: Vec<_> = machine
        .grid()
        .iter()
        .filter(|c| c.has_reward())
        .map(|c| c.coords())
        .collect();
    machine.drain_effects();

    for coords in rewards {
        machine.cell_clicked(coords);
        machine.advance_by(5_000);
        machine.press(Button::DismissPopup);
    }
    let effects = machine.drain_effects();

    let blasts = effects
        .iter()
        .filter(|&&e| e == Effect::Sound(SoundKind::Blast))
        .count();
    let popups = effects
        .iter()
        .filter(|e| matches!(e, Effect::ShowRewardPopup(_)))
        .count();
    assert_eq!(blasts, 10);
    assert_eq!(popups, 9);
    assert_eq!(machine.state(), GameState::Win);
    assert_eq!(machine.session().lives_remaining(), 3);
    assert!(effects.contains(&Effect::Sound(SoundKind::WinLaugh)));
}

#[test]
fn replay_starts_a_new_closed_grid() {
    let mut machine = playing(21);
    for coords in iter_coords((5, 4)) {
        machine.cell_clicked(coords);
    }
    machine.advance_by(60_000);
    assert!(machine.state().is_finished());

    assert_eq!(machine.press(Button::PlayAgain), ClickOutcome::Advanced);
    assert_eq!(machine.state(), GameState::CountdownOpen);
    for cell in machine.grid().iter() {
        assert_eq!(cell.state(), CellState::Closed);
        assert_eq!(cell.frame(), 0);
    }
    assert_eq!(machine.grid().reward_count(), 10);

    machine.advance_by(60_000);
    assert_eq!(machine.state(), GameState::Instructions2);
}
