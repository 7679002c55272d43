use notes_types::Note;

/// Notes whose markdown or tag contains `query`, ignoring case.
/// A blank query matches everything.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return notes.iter().collect();
    }

    notes
        .iter()
        .filter(|n| {
            n.markdown.to_lowercase().contains(&needle)
                || n.tag_str().to_lowercase().contains(&needle)
        })
        .collect()
}
