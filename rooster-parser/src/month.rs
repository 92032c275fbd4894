/// Dutch month names, truncated to the shortest prefix that is still unambiguous.
static MONTHS: [(&str, u32); 12] = [
    ("janu", 1),
    ("febru", 2),
    ("maart", 3),
    ("april", 4),
    ("mei", 5),
    ("juni", 6),
    ("juli", 7),
    ("augus", 8),
    ("septe", 9),
    ("oktob", 10),
    ("novem", 11),
    ("decem", 12),
];

/// Maps a Dutch month name (or any word starting with one) to its number.
///
/// Only the first five characters of `name` are considered, compared
/// case-insensitively. Diacritics are not folded.
pub fn resolve_month(name: &str) -> Option<u32> {
    let key = name.to_lowercase().chars().take(5).collect::<String>();
    if key.is_empty() {
        return None;
    }

    MONTHS
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|&(_, month)| month)
}
