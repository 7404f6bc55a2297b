//! Layout sources feeding the spawn planner.

use std::{fs, path::Path};

use crawl_core::{CellCoord, LayoutSource, WallMask};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Character marking a wall in ASCII map files.
const WALL_GLYPH: char = '#';

/// Errors raised while loading an ASCII map.
#[derive(Debug, Error)]
pub(crate) enum LayoutError {
    /// The map file could not be read.
    #[error("could not read map file {path}")]
    Io {
        /// Path that failed to load.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The map contained no rows.
    #[error("map is empty")]
    Empty,
}

/// Fixed layout drawn as text: `#` is a wall, any other character is floor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AsciiLayout {
    mask: WallMask,
}

impl AsciiLayout {
    /// Loads a map from disk.
    pub(crate) fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses a map. Short rows are padded with walls; trailing blank lines
    /// are ignored.
    pub(crate) fn parse(contents: &str) -> Result<Self, LayoutError> {
        let mut lines: Vec<&str> = contents.lines().map(|line| line.trim_end_matches('\r')).collect();
        while lines.last().is_some_and(|line| line.trim().is_empty()) {
            let _ = lines.pop();
        }

        let columns = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        if lines.is_empty() || columns == 0 {
            return Err(LayoutError::Empty);
        }

        let mut cells = Vec::with_capacity(columns * lines.len());
        for line in &lines {
            let mut glyphs = line.chars();
            for _ in 0..columns {
                cells.push(glyphs.next().map_or(true, |glyph| glyph == WALL_GLYPH));
            }
        }

        let columns = u32::try_from(columns).map_err(|_| LayoutError::Empty)?;
        let rows = u32::try_from(lines.len()).map_err(|_| LayoutError::Empty)?;
        let mask = WallMask::from_cells(columns, rows, cells).ok_or(LayoutError::Empty)?;
        Ok(Self { mask })
    }

    /// Width of the map in tiles.
    pub(crate) const fn columns(&self) -> u32 {
        self.mask.columns()
    }

    /// Height of the map in tiles.
    pub(crate) const fn rows(&self) -> u32 {
        self.mask.rows()
    }
}

impl LayoutSource for AsciiLayout {
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask {
        if columns == self.mask.columns() && rows == self.mask.rows() {
            return self.mask.clone();
        }
        let mut mask = WallMask::filled(columns, rows, true);
        for (cell, wall) in self.mask.iter() {
            mask.set_wall(cell, wall);
        }
        mask
    }
}

/// Seeded generator producing a walled arena with scattered pillars.
#[derive(Debug)]
pub(crate) struct ArenaLayout {
    rng: ChaCha8Rng,
    pillar_one_in: u32,
}

impl ArenaLayout {
    /// Creates a generator; on average one interior cell in `pillar_one_in`
    /// becomes a pillar.
    pub(crate) fn new(seed: u64, pillar_one_in: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            pillar_one_in,
        }
    }
}

impl LayoutSource for ArenaLayout {
    fn generate(&mut self, columns: u32, rows: u32) -> WallMask {
        let mut mask = WallMask::filled(columns, rows, false);
        for row in 0..rows {
            for column in 0..columns {
                let border = column == 0 || row == 0 || column + 1 == columns || row + 1 == rows;
                let pillar = self.pillar_one_in > 0 && self.rng.gen_range(0..self.pillar_one_in) == 0;
                if border || pillar {
                    mask.set_wall(CellCoord::new(column, row), true);
                }
            }
        }
        tracing::debug!(columns, rows, "arena layout generated");
        mask
    }
}
