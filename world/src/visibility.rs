//! Fog-of-war reveal around a center tile.

use crawl_core::CellCoord;

use crate::grid::Grid;

/// Reveals the square of tiles within `radius` of `center`.
///
/// Coordinates are clamped like every other grid access. Tiles are never
/// hidden again. Returns the number of tiles that were hidden before.
pub(crate) fn reveal(grid: &mut Grid, center: CellCoord, radius: u32) -> usize {
    let radius = i64::from(radius);
    let center_column = i64::from(center.column());
    let center_row = i64::from(center.row());
    let low = grid.clamp(center_column - radius, center_row - radius);
    let high = grid.clamp(center_column + radius, center_row + radius);
    let mut newly_revealed = 0;
    for row in low.row()..=high.row() {
        for column in low.column()..=high.column() {
            if grid.reveal_tile(CellCoord::new(column, row)) {
                newly_revealed += 1;
            }
        }
    }
    newly_revealed
}
