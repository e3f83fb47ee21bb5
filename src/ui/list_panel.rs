// List Panel
// Terminal list surface: rows, selection and the new-entry input

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use super::renderer::{DisplayRow, ListSurface, StatusIcon};
use super::Styles;
use crate::config::ListContainer;

/// A list panel in the console
#[derive(Debug, Clone)]
pub struct ListPanel {
    /// Container this panel displays
    pub container: ListContainer,

    rows: Vec<DisplayRow>,
    selected: usize,

    /// Text typed into the new-entry row
    input: String,

    /// Completed render passes
    refreshes: u64,
}

impl ListPanel {
    pub fn new(container: ListContainer) -> Self {
        Self {
            container,
            rows: Vec::new(),
            selected: 0,
            input: String::new(),
            refreshes: 0,
        }
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    /// Identities of the displayed entries, in order
    pub fn entry_names(&self) -> Vec<&str> {
        self.rows.iter().filter_map(DisplayRow::entry_name).collect()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_row(&self) -> Option<&DisplayRow> {
        self.rows.get(self.selected)
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let max = self.rows.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    /// Whether keystrokes go to the new-entry row
    pub fn is_editing(&self) -> bool {
        self.selected_row().is_some_and(DisplayRow::is_input)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// True once the first fetch has been rendered
    pub fn is_loaded(&self) -> bool {
        self.refreshes > 0
    }
}

impl ListSurface for ListPanel {
    fn clear(&mut self) {
        self.rows.clear();
        self.input.clear();
    }

    fn append(&mut self, row: DisplayRow) {
        self.rows.push(row);
    }

    fn refresh(&mut self) {
        let max = self.rows.len().saturating_sub(1);
        self.selected = self.selected.min(max);
        self.refreshes += 1;
    }
}

/// Plain-text form of a row
pub fn row_text(row: &DisplayRow) -> String {
    match row.icon {
        Some(StatusIcon::Locked) => format!("[locked] {}", row.label),
        None => row.label.clone(),
    }
}

/// Render a list panel
pub fn render_list_panel(f: &mut Frame, panel: &ListPanel, is_focused: bool, area: Rect) {
    let items: Vec<ListItem> = panel
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let style = if idx == panel.selected && is_focused {
                Styles::list_selected_focused()
            } else if idx == panel.selected {
                Styles::list_selected_unfocused()
            } else {
                Styles::list_normal()
            };

            if row.is_input() {
                let (text, text_style) = if panel.input.is_empty() {
                    (row.label.clone(), Styles::input_placeholder())
                } else {
                    (panel.input.clone(), style)
                };
                let cursor = if idx == panel.selected && is_focused { "_" } else { "" };
                return ListItem::new(Line::from(vec![
                    Span::styled("> ", Styles::input_prompt()),
                    Span::styled(format!("{text}{cursor}"), text_style),
                ]));
            }

            let (icon, icon_style) = match row.icon {
                Some(StatusIcon::Locked) => ("🔒 ", Styles::status_locked()),
                None => ("   ", Styles::list_normal()),
            };

            ListItem::new(Line::from(vec![
                Span::styled(icon, icon_style),
                Span::styled(row.label.clone(), style),
            ]))
        })
        .collect();

    let title_style = if is_focused {
        Styles::title_focused()
    } else {
        Styles::title_unfocused()
    };

    let border_style = if is_focused {
        Styles::border_focused()
    } else {
        Styles::border_unfocused()
    };

    let title = if panel.is_loaded() {
        format!(" {} ", panel.container.title)
    } else {
        format!(" {} (loading) ", panel.container.title)
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(title, title_style)),
    );

    let mut list_state = ListState::default();
    if !panel.rows.is_empty() {
        list_state.select(Some(panel.selected));
    }
    f.render_stateful_widget(list, area, &mut list_state);
}
