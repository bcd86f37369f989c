use core::ops::{Index, IndexMut};
use ndarray::Array2;
use rand::Rng;

use crate::*;

/// The windows of one session, with rewards hidden behind some of them.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    /// All windows closed, nothing placed.
    pub fn empty(size: Coord2) -> Self {
        Self {
            cells: Array2::from_shape_fn(size.to_nd_index(), |(row, col)| {
                Cell::new((row as Coord, col as Coord))
            }),
        }
    }

    /// Builds a fresh grid and hides `config.rewards` distinct catalog entries in distinct
    /// random cells.
    pub fn setup<R: Rng + ?Sized>(
        config: &GameConfig,
        catalog: &RewardCatalog,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        catalog.ensure_covers(config.rewards)?;

        let size = config.size();
        let mut grid = Self::empty(size);
        let chosen = rand::seq::index::sample(rng, catalog.len(), config.rewards.into());

        for index in chosen.into_iter() {
            let reward = catalog.at(index).id;
            loop {
                let coords = (rng.random_range(0..size.0), rng.random_range(0..size.1));
                let cell = &mut grid[coords];
                if !cell.has_reward() {
                    cell.place_reward(reward);
                    break;
                }
            }
        }

        log::debug!(
            "grid {}x{} set up with {} rewards",
            size.0,
            size.1,
            config.rewards
        );
        Ok(grid)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn total_cells(&self) -> CellCount {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Option<&Cell> {
        self.cells.get(coords.to_nd_index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Coordinates of every cell currently in `state`, row-major.
    pub fn coords_in_state(&self, state: CellState) -> impl Iterator<Item = Coord2> + '_ {
        self.cells
            .iter()
            .filter(move |cell| cell.state == state)
            .map(Cell::coords)
    }

    pub fn count_in_state(&self, state: CellState) -> CellCount {
        self.coords_in_state(state).count() as CellCount
    }

    pub fn reward_count(&self) -> CellCount {
        self.cells.iter().filter(|cell| cell.has_reward()).count() as CellCount
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
