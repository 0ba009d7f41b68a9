/// Single coordinate axis used for board height, width, and positions.
pub type Coord = u8;

/// Count type used for mine counts, flag counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Every cell of a `size` board in row-major order.
pub fn iter_coords(size: Coord2) -> impl Iterator<Item = Coord2> + Clone {
    let (rows, cols) = size;
    (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
}

/// The up to 8 cells touching `center` inside `bounds`, in row-major order.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> + Clone {
    let (row, col) = center;
    let (rows, cols) = bounds;
    let row_span = row.saturating_sub(1)..=row.saturating_add(1).min(rows.saturating_sub(1));
    let col_span = col.saturating_sub(1)..=col.saturating_add(1).min(cols.saturating_sub(1));

    row_span
        .flat_map(move |r| col_span.clone().map(move |c| (r, c)))
        .filter(move |&pos| pos != center)
}
