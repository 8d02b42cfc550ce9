//! Synthetic brightness-temperature data.
//!
//! Values are predictable so tests can check individual cells after a
//! round trip through a reader.

/// Legacy binary grid shape for the north polar stereographic grid.
pub const NORTH_SHAPE: (usize, usize) = (448, 304);

/// Legacy binary grid shape for the south polar stereographic grid.
pub const SOUTH_SHAPE: (usize, usize) = (332, 316);

/// Raw tenths-of-Kelvin counts with a missing (`0`) cell every `gap` cells.
///
/// Non-missing cells hold `1500 + (index % 1000)`, i.e. 150.0 K to 249.9 K.
/// `gap == 0` disables missing cells.
///
/// ```
/// use test_utils::create_tb_counts;
///
/// let counts = create_tb_counts(2, 3, 4);
/// assert_eq!(counts, vec![0, 1501, 1502, 1503, 0, 1505]);
/// ```
pub fn create_tb_counts(rows: usize, cols: usize, gap: usize) -> Vec<i16> {
    (0..rows * cols)
        .map(|i| {
            if gap != 0 && i % gap == 0 {
                0
            } else {
                1500 + (i % 1000) as i16
            }
        })
        .collect()
}

/// Kelvin value the binary reader should produce for `create_tb_counts`
/// cell `index`, `None` for missing cells.
pub fn expected_kelvin(index: usize, gap: usize) -> Option<f64> {
    if gap != 0 && index % gap == 0 {
        None
    } else {
        Some((1500 + (index % 1000)) as f64 * 0.1)
    }
}

/// Encode counts as little-endian int16 bytes.
pub fn encode_i16_le(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
