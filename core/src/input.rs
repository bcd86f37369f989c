use serde::{Deserialize, Serialize};

use crate::*;

/// Where the grid sits on screen, in the same units as pointer coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    pub size: Coord2,
    pub offset_x: f64,
    pub offset_y: f64,
    pub cell_size: f64,
    pub spacing: f64,
}

impl GridGeometry {
    /// Largest whole-pixel square cells that fit `width x height`, centred.
    pub fn fit(width: f64, height: f64, size: Coord2, spacing: f64) -> Self {
        let rows = f64::from(size.0.max(1));
        let cols = f64::from(size.1.max(1));
        let gaps_x = (cols - 1.0) * spacing;
        let gaps_y = (rows - 1.0) * spacing;

        let fitted = ((width - gaps_x) / cols).min((height - gaps_y) / rows);
        // Truncation is floor for the non-negative case.
        let cell_size = if fitted > 0.0 { fitted as u32 as f64 } else { 0.0 };

        Self {
            size,
            offset_x: (width - (cols * cell_size + gaps_x)) / 2.0,
            offset_y: (height - (rows * cell_size + gaps_y)) / 2.0,
            cell_size,
            spacing,
        }
    }

    /// Top-left corner of a cell.
    pub fn cell_origin(&self, (row, col): Coord2) -> (f64, f64) {
        let pitch = self.cell_size + self.spacing;
        (
            self.offset_x + f64::from(col) * pitch,
            self.offset_y + f64::from(row) * pitch,
        )
    }

    /// The cell under a point; points in the gaps or outside the grid hit nothing.
    pub fn hit_cell(&self, x: f64, y: f64) -> Option<Coord2> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let pitch = self.cell_size + self.spacing;
        let dx = x - self.offset_x;
        let dy = y - self.offset_y;
        if !dx.is_finite() || !dy.is_finite() || dx < 0.0 || dy < 0.0 {
            return None;
        }

        let col = (dx / pitch) as u32;
        let row = (dy / pitch) as u32;
        if row >= u32::from(self.size.0) || col >= u32::from(self.size.1) {
            return None;
        }
        if dx - f64::from(col) * pitch > self.cell_size || dy - f64::from(row) * pitch > self.cell_size {
            return None;
        }
        Some((row as Coord, col as Coord))
    }
}

/// Request derived from a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    IntentToPlay,
    Press(Button),
    Cell(Coord2),
}

/// Turns raw pointer positions into actions for the current screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InputRouter {
    geometry: GridGeometry,
}

impl InputRouter {
    pub fn new(geometry: GridGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: GridGeometry) {
        self.geometry = geometry;
    }

    /// Screens that advance on a single tap take one anywhere; while playing only a cell hit
    /// counts. Buttons of the end screens and the popup are pressed explicitly.
    pub fn route(&self, state: GameState, x: f64, y: f64) -> Option<Action> {
        use GameState::*;

        match state {
            Title => Some(Action::IntentToPlay),
            Instructions1 => Some(Action::Press(Button::Start)),
            Instructions2 => Some(Action::Press(Button::Understood)),
            Playing => self.geometry.hit_cell(x, y).map(Action::Cell),
            CountdownOpen | RevealTimer | CloseAll | Popup | Win | Lose => None,
        }
    }
}
