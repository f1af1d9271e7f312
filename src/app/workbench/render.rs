//! Ratatui rendering of the workbench: sidebar tree, tab row, editor,
//! preview column, terminal panel, status bar and modal overlays.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::kernel::Action;
use crate::models::TreeRow;

use super::{Focus, Workbench};

const SIDEBAR_WIDTH: u16 = 28;
const TERMINAL_HEIGHT: u16 = 10;
const STATUS_HEIGHT: u16 = 1;

impl Workbench {
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let ui = &self.store.state().ui;
        let terminal_visible = ui.terminal_visible;
        let sidebar_visible = ui.sidebar_visible;

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(if terminal_visible {
                vec![
                    Constraint::Min(3),
                    Constraint::Length(TERMINAL_HEIGHT),
                    Constraint::Length(STATUS_HEIGHT),
                ]
            } else {
                vec![Constraint::Min(3), Constraint::Length(STATUS_HEIGHT)]
            })
            .split(area);

        let main = rows[0];
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(if sidebar_visible {
                vec![
                    Constraint::Length(SIDEBAR_WIDTH),
                    Constraint::Percentage(45),
                    Constraint::Min(20),
                ]
            } else {
                vec![Constraint::Percentage(55), Constraint::Min(20)]
            })
            .split(main);

        let (editor_area, preview_area) = if sidebar_visible {
            self.render_sidebar(frame, cols[0]);
            (cols[1], cols[2])
        } else {
            (cols[0], cols[1])
        };

        self.render_editor(frame, editor_area);
        self.render_preview(frame, preview_area);

        if terminal_visible {
            self.render_terminal(frame, rows[1]);
        }
        self.render_status(frame, rows[rows.len() - 1]);

        if self.prompt.visible() {
            self.render_prompt(frame, area);
        }
        if self.store.state().ui.confirm_dialog.visible {
            self.render_confirm(frame, area);
        }
    }

    fn render_sidebar(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Explorer;
        let block = pane_block("Explorer", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let view_height = inner.height as usize;
        self.dispatch(Action::ExplorerSetViewHeight {
            height: view_height.max(1),
        });

        let explorer = &self.store.state().explorer;
        let selected = explorer.selected_path.clone();
        let lines: Vec<Line> = explorer
            .rows
            .iter()
            .skip(explorer.scroll_offset)
            .take(view_height)
            .map(|row| tree_row_line(row, selected.as_deref()))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Editor;
        let title = self.tab_row();
        let block = pane_block(&title, focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.store.state().open_files.is_empty() {
            frame.render_widget(
                Paragraph::new("No file open").style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        let first = self.editor.cursor_line.saturating_sub(height.saturating_sub(1));
        let gutter = (self.editor.lines.len().max(1)).ilog10() as usize + 1;

        let lines: Vec<Line> = self
            .editor
            .lines
            .iter()
            .enumerate()
            .skip(first)
            .take(height)
            .map(|(idx, text)| {
                let number = Span::styled(
                    format!("{:>gutter$} ", idx + 1),
                    Style::default().fg(Color::DarkGray),
                );
                Line::from(vec![number, Span::raw(text.clone())])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if focused {
            let rel_line = (self.editor.cursor_line - first) as u16;
            let col = (gutter + 1 + self.editor.cursor_col) as u16;
            if rel_line < inner.height && col < inner.width {
                frame.set_cursor_position((inner.x + col, inner.y + rel_line));
            }
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect) {
        let preview = &self.store.state().preview;
        let title = format!("Preview (build {})", preview.generation());
        let block = pane_block(&title, false);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = Vec::new();
        for error in preview.errors() {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        }
        if preview.has_errors() {
            lines.push(Line::default());
        }

        if let Some(build) = self.surface.current() {
            let budget = (inner.height as usize).saturating_sub(lines.len());
            for text in build.document.lines().take(budget) {
                lines.push(Line::from(text.to_string()));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "No document injected yet",
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_terminal(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Terminal;
        let block = pane_block("Terminal", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let height = inner.height as usize;
        let terminal = &self.store.state().terminal;
        let visible = height.saturating_sub(1);
        let start = terminal.lines().len().saturating_sub(visible);

        let mut lines: Vec<Line> = terminal.lines()[start..]
            .iter()
            .map(|l| Line::from(l.clone()))
            .collect();
        lines.push(Line::from(vec![
            Span::styled("$ ", Style::default().fg(Color::Green)),
            Span::raw(self.terminal_input.clone()),
        ]));
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let state = self.store.state();
        let mut spans = Vec::new();

        if let Some(path) = state.open_files.active_path() {
            let dirty = if state.open_files.is_dirty(path) { "*" } else { "" };
            spans.push(Span::raw(format!(" {path}{dirty} ")));
        }
        if let Some(note) = &state.ui.notification {
            spans.push(Span::styled(
                format!("| {note} "),
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(find) = &self.editor.find_prompt {
            spans.push(Span::styled(
                format!("| find: {find} "),
                Style::default().fg(Color::Cyan),
            ));
        }
        if state.preview.has_errors() {
            spans.push(Span::styled(
                "| preview errors ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        let cursor = state.ui.cursor;
        spans.push(Span::raw(format!("| Ln {}, Col {}", cursor.line, cursor.column)));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
            area,
        );
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let rect = centered_rect(area, 44, 4);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.prompt.title)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let mut lines = vec![Line::from(self.prompt.value.clone())];
        if let Some(err) = &self.prompt.error {
            lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect) {
        let dialog = &self.store.state().ui.confirm_dialog;
        let rect = centered_rect(area, 50, 4);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Unsaved changes")
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(dialog.message.clone()),
                Line::from(Span::styled(
                    "[y] close  [n] keep open",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            inner,
        );
    }

    fn tab_row(&self) -> String {
        let open_files = &self.store.state().open_files;
        let active = open_files.active_path();
        let mut parts = Vec::new();
        for entry in open_files.entries() {
            let name = entry.path.rsplit('/').next().unwrap_or(&entry.path);
            let dirty = if entry.is_dirty { "*" } else { "" };
            if Some(entry.path.as_str()) == active {
                parts.push(format!("[{name}{dirty}]"));
            } else {
                parts.push(format!(" {name}{dirty} "));
            }
        }
        if parts.is_empty() {
            "Editor".to_string()
        } else {
            parts.join("")
        }
    }
}

fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(border)
}

fn tree_row_line(row: &TreeRow, selected: Option<&str>) -> Line<'static> {
    let indent = "  ".repeat(row.depth as usize);
    let marker = if row.is_folder {
        if row.is_open {
            "▾ "
        } else {
            "▸ "
        }
    } else {
        "  "
    };
    let dirty = if row.is_dirty { "*" } else { "" };
    let text = format!("{indent}{marker}{}{dirty}", row.name);

    let style = if selected == Some(row.path.as_str()) {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else if row.is_folder {
        Style::default().fg(Color::Blue)
    } else {
        Style::default()
    };
    Line::from(Span::styled(text, style))
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
