use spritework_core::abstract_editor::{EditActionHistory, Editable};

/// Renders the undo/redo history as text, one entry per line.
///
/// Redo entries come first, the next one to redo closest to the `current`
/// marker, followed by undo entries, most recent first.
pub fn history_lines<E: Editable>(history: &EditActionHistory<E>) -> Vec<String> {
    let mut lines = vec![format!(
        "Undo: {} | Redo: {}{}",
        history.undo_count(),
        history.redo_count(),
        if history.has_unsaved_changes() {
            " | modified"
        } else {
            ""
        }
    )];

    let redo: Vec<_> = history.redo_descriptions().collect();
    lines.extend(redo.iter().rev().map(|desc| format!("REDO {desc}")));
    lines.push("> current".into());
    lines.extend(history.undo_descriptions().map(|desc| format!("UNDO {desc}")));
    lines
}

/// Logs the history at debug level.
pub fn log_history<E: Editable>(history: &EditActionHistory<E>) {
    for line in history_lines(history) {
        log::debug!("{line}");
    }
}
