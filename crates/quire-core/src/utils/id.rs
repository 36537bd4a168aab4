const ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

/// Generate a fresh note ID for text that slugifies to nothing.
///
/// Uses nanoid over lowercase letters and digits only, so the result is a
/// single valid segment.
pub fn generate_note_id(len: usize) -> String {
    let size = len.max(1);
    nanoid::nanoid!(size, &ALPHABET)
}
