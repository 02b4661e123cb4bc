/// Names a zero-based column the way spreadsheets do: A through Z, then AA, AB, and so on. This
/// is bijective base-26, so every index gets a distinct name.
pub fn column_label(index: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = index;
    loop {
        letters.push(b'A' + (remaining % 26) as u8);
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }
    letters.reverse();
    letters.into_iter().map(char::from).collect()
}

/// "A1" is the northwest cell. Rows count from 1, southward.
pub fn cell_label(row: usize, col: usize) -> String {
    format!("{}{}", column_label(col), row + 1)
}
