//! Well-address helpers.
//!
//! Labware grids are addressed row-letter-then-column (`"B7"`). The
//! simulator validates addresses against a grid derived from the labware
//! kind; the CSV converter assigns addresses in column-major order, the
//! order tubes are racked by hand.

const ROW_LETTERS: &str = "ABCDEFGHIJKLMNOP";

/// Derive (rows, columns) from a vendor labware kind string.
///
/// Falls back to a 96-well grid for unrecognized kinds.
pub fn grid_for_kind(kind: &str) -> (usize, usize) {
    if kind.contains("_384") {
        (16, 24)
    } else if kind.contains("_24") {
        (4, 6)
    } else {
        (8, 12)
    }
}

/// Parse a well address into zero-based (row, column) indices.
pub fn parse_address(address: &str) -> Option<(usize, usize)> {
    let mut chars = address.chars();
    let row = ROW_LETTERS.find(chars.next()?)?;
    let rest = chars.as_str();
    if rest.is_empty() {
        return None;
    }
    let column: usize = rest.parse().ok()?;
    if column == 0 {
        return None;
    }
    Some((row, column - 1))
}

/// Whether an address falls inside a (rows, columns) grid.
pub fn within_grid(address: &str, grid: (usize, usize)) -> bool {
    match parse_address(address) {
        Some((row, column)) => row < grid.0 && column < grid.1,
        None => false,
    }
}

/// All addresses of a grid in column-major order: `A1, B1, ... A2, B2, ...`
pub fn column_major(rows: usize, columns: usize) -> Vec<String> {
    let mut addresses = Vec::with_capacity(rows * columns);
    for column in 1..=columns {
        for row in ROW_LETTERS.chars().take(rows) {
            addresses.push(format!("{row}{column}"));
        }
    }
    addresses
}
