use typeahead_core::{Dropdown, SearchViewModel};

/// Text frame for one view: the input line followed by the dropdown.
pub(crate) fn render(view: &SearchViewModel) -> Vec<String> {
    let cursor = if view.focused { '>' } else { ' ' };
    let mut lines = vec![format!("{cursor} {}", view.query)];

    match view.dropdown() {
        Dropdown::Hidden => {}
        Dropdown::Loading => lines.push("  Loading...".to_string()),
        Dropdown::Failed(message) => lines.push(format!("  ! {message}")),
        Dropdown::NoResults => lines.push("  No results".to_string()),
        Dropdown::Results(rows) => {
            lines.extend(rows.iter().map(|row| format!("  - {} (#{})", row.name, row.id)));
        }
    }
    lines
}
