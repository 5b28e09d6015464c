const ALPHABET_LEN: usize = 26;

/// Label of the waypoint at `index` (zero based): "A" through "Z", then the
/// one-based position as a number ("27", "28", ...).
pub fn waypoint_label(index: usize) -> String {
    if index < ALPHABET_LEN {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

pub fn waypoint_labels(len: usize) -> Vec<String> {
    (0..len).map(waypoint_label).collect()
}
