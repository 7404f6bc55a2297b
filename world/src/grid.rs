//! Tile storage with clamp-to-edge addressing.

use crawl_core::{clamp_cell, CellCoord, Decoration, Occupant, Terrain, WallMask};

/// One cell of the world grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    terrain: Terrain,
    occupant: Option<Occupant>,
    revealed: bool,
    decorations: Vec<Decoration>,
}

impl Tile {
    fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            occupant: None,
            revealed: false,
            decorations: Vec::new(),
        }
    }

    /// Terrain kind of the tile.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Entity currently standing on the tile, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<Occupant> {
        self.occupant
    }

    /// Reports whether the tile was ever shown to the player.
    #[must_use]
    pub const fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Cosmetic marks in the order they were left.
    #[must_use]
    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    /// Floor without an occupant.
    #[must_use]
    pub fn is_walkable(&self) -> bool {
        self.terrain == Terrain::Floor && self.occupant.is_none()
    }
}

/// Fixed-size grid of tiles addressed by column and row.
///
/// Every accessor clamps its coordinates into the grid, so reads near the
/// border observe the edge tile instead of failing.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Builds a grid whose terrain mirrors the provided mask.
    #[must_use]
    pub(crate) fn from_mask(mask: &WallMask) -> Self {
        let columns = mask.columns().max(1);
        let rows = mask.rows().max(1);
        let mut tiles = Vec::with_capacity(usize::try_from(columns * rows).unwrap_or(0));
        for row in 0..rows {
            for column in 0..columns {
                let terrain = if mask.is_wall(CellCoord::new(column, row)) {
                    Terrain::Wall
                } else {
                    Terrain::Floor
                };
                tiles.push(Tile::new(terrain));
            }
        }
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Clamps a signed coordinate pair onto the grid.
    #[must_use]
    pub fn clamp(&self, column: i64, row: i64) -> CellCoord {
        clamp_cell(column, row, self.columns, self.rows)
    }

    /// Returns the tile at the clamped coordinates.
    #[must_use]
    pub fn tile_at(&self, column: i64, row: i64) -> &Tile {
        self.tile(self.clamp(column, row))
    }

    /// Returns the tile at the provided cell, clamped onto the grid.
    #[must_use]
    pub fn tile(&self, cell: CellCoord) -> &Tile {
        &self.tiles[self.index(cell)]
    }

    /// Floor without an occupant, after clamping.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.tile(cell).is_walkable()
    }

    /// Entity on the clamped cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.tile(cell).occupant()
    }

    /// Iterates over every tile in row-major order alongside its cell.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &Tile)> + '_ {
        let columns = self.columns;
        self.tiles.iter().enumerate().map(move |(index, tile)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), tile)
        })
    }

    /// Writes the occupant of exactly one tile. Walls never accept an occupant.
    pub(crate) fn set_occupant(&mut self, cell: CellCoord, occupant: Option<Occupant>) {
        let index = self.index(cell);
        let tile = &mut self.tiles[index];
        if occupant.is_some() && tile.terrain == Terrain::Wall {
            tracing::warn!(?cell, ?occupant, "refused to place occupant on a wall");
            return;
        }
        tile.occupant = occupant;
    }

    /// Marks the tile as revealed, reporting whether it was hidden before.
    pub(crate) fn reveal_tile(&mut self, cell: CellCoord) -> bool {
        let index = self.index(cell);
        let tile = &mut self.tiles[index];
        let was_hidden = !tile.revealed;
        tile.revealed = true;
        was_hidden
    }

    /// Appends a cosmetic mark to the tile.
    pub(crate) fn decorate(&mut self, cell: CellCoord, mark: Decoration) {
        let index = self.index(cell);
        self.tiles[index].decorations.push(mark);
    }

    fn index(&self, cell: CellCoord) -> usize {
        let column = cell.column().min(self.columns - 1) as usize;
        let row = cell.row().min(self.rows - 1) as usize;
        row * self.columns as usize + column
    }
}
