// reeltag (video catalog builder and viewer)
// Copyright (C) 2025 Andrew Nissen

use crate::cards::{self, Card, CatalogView, Debouncer, SEARCH_DEBOUNCE, ViewState};
use crate::filter::CatalogFilter;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState, Wrap},
};
use std::{
    error::Error,
    io,
    path::Path,
    time::{Duration, Instant},
};
use tracing::warn;

const IDLE_POLL: Duration = Duration::from_millis(200);

pub struct TableColors {
    pub buffer_bg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub row_fg: Color,
    pub selected_style_fg: Color,
    pub normal_row_color: Color,
    pub alt_row_color: Color,
    pub footer_border_color: Color,
}

impl TableColors {
    const fn new(color: &tailwind::Palette) -> Self {
        Self {
            buffer_bg: tailwind::SLATE.c950,
            header_bg: color.c900,
            header_fg: tailwind::SLATE.c200,
            row_fg: tailwind::SLATE.c200,
            selected_style_fg: color.c400,
            normal_row_color: tailwind::SLATE.c950,
            alt_row_color: tailwind::SLATE.c900,
            footer_border_color: color.c400,
        }
    }
}

mod tailwind {
    use ratatui::style::Color;

    pub struct Palette {
        pub c200: Color,
        pub c400: Color,
        pub c900: Color,
        pub c950: Color,
    }

    pub const SLATE: Palette = Palette {
        c200: Color::Rgb(226, 232, 240),
        c400: Color::Rgb(148, 163, 184),
        c900: Color::Rgb(15, 23, 42),
        c950: Color::Rgb(2, 6, 23),
    };

    pub const BLUE: Palette = Palette {
        c200: Color::Rgb(191, 219, 254),
        c400: Color::Rgb(96, 165, 250),
        c900: Color::Rgb(30, 58, 138),
        c950: Color::Rgb(23, 37, 84),
    };
}

const CHIP_COLORS: [Color; 4] = [
    tailwind::BLUE.c200,
    Color::Rgb(187, 247, 208),
    Color::Rgb(254, 240, 138),
    Color::Rgb(233, 213, 255),
];

pub struct App {
    pub state: TableState,
    pub colors: TableColors,
    pub view: CatalogView,
    pub search_input: String,
    pub search_input_mode: bool,
    pub search_debounce: Debouncer,
    pub show_tag_popup: bool,
    pub tag_popup_selected: usize,
    pub show_full_path: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(mut view: CatalogView) -> App {
        // A failed load is already recorded in the view state.
        let _ = view.reload();

        let mut app = App {
            state: TableState::default(),
            colors: TableColors::new(&tailwind::BLUE),
            view,
            search_input: String::new(),
            search_input_mode: false,
            search_debounce: Debouncer::new(SEARCH_DEBOUNCE),
            show_tag_popup: false,
            tag_popup_selected: 0,
            show_full_path: false,
            status_message: None,
        };
        app.select_first();
        app
    }

    pub fn select_first(&mut self) {
        if self.view.visible().is_empty() {
            self.state.select(None);
        } else {
            self.state.select(Some(0));
        }
    }

    pub fn next(&mut self) {
        let len = self.view.visible().len();
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None if len > 0 => 0,
            None => return,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let i = match self.state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        if !self.view.visible().is_empty() {
            self.state.select(Some(i));
        }
    }

    pub fn selected_card(&self) -> Option<Card> {
        let index = self.state.selected()?;
        let visible = self.view.visible();
        visible.get(index).map(|entry| Card::from_entry(index, entry))
    }

    pub fn refresh(&mut self) {
        self.search_input.clear();
        self.search_debounce = Debouncer::new(SEARCH_DEBOUNCE);
        self.status_message = match self.view.refresh() {
            Ok(()) => Some("Catalog reloaded".to_string()),
            Err(e) => Some(format!("Reload failed: {}", e)),
        };
        self.select_first();
    }

    pub fn add_char_to_search(&mut self, c: char) {
        if self.search_input_mode {
            self.search_input.push(c);
            self.search_debounce.touch(Instant::now());
        }
    }

    pub fn remove_char_from_search(&mut self) {
        if self.search_input_mode {
            self.search_input.pop();
            self.search_debounce.touch(Instant::now());
        }
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_input_mode = false;
        self.apply_search();
    }

    /// Commits the typed search text, skipping any pending debounce.
    pub fn apply_search(&mut self) {
        self.search_debounce = Debouncer::new(SEARCH_DEBOUNCE);
        self.view.filter = CatalogFilter::new(
            self.view.filter.tag.clone(),
            Some(self.search_input.clone()),
        );
        self.select_first();
    }

    /// Called from the event loop; re-filters once typing has paused.
    pub fn tick(&mut self, now: Instant) {
        if self.search_debounce.fire(now) {
            self.apply_search();
        }
    }

    pub fn next_poll_timeout(&self, now: Instant) -> Duration {
        self.search_debounce
            .time_left(now)
            .map(|left| left.min(IDLE_POLL))
            .unwrap_or(IDLE_POLL)
    }

    pub fn open_tag_popup(&mut self) {
        self.show_tag_popup = true;
        self.tag_popup_selected = self
            .view
            .filter
            .tag
            .as_ref()
            .and_then(|tag| self.view.vocabulary().iter().position(|t| t == tag))
            .map(|i| i + 1)
            .unwrap_or(0);
    }

    pub fn close_tag_popup(&mut self) {
        self.show_tag_popup = false;
    }

    /// Option 0 is "all tags"; the vocabulary follows.
    pub fn tag_popup_option_count(&self) -> usize {
        self.view.vocabulary().len() + 1
    }

    pub fn tag_popup_next(&mut self) {
        if self.tag_popup_selected + 1 < self.tag_popup_option_count() {
            self.tag_popup_selected += 1;
        }
    }

    pub fn tag_popup_previous(&mut self) {
        self.tag_popup_selected = self.tag_popup_selected.saturating_sub(1);
    }

    pub fn apply_tag_popup(&mut self) {
        let tag = match self.tag_popup_selected {
            0 => None,
            i => self.view.vocabulary().get(i - 1).cloned(),
        };
        self.view.filter = CatalogFilter::new(tag, self.view.filter.search.clone());
        self.show_tag_popup = false;
        self.select_first();
    }

    pub fn clear_tag(&mut self) {
        self.view.filter = CatalogFilter::new(None, self.view.filter.search.clone());
        self.select_first();
    }

    pub fn toggle_full_path(&mut self) {
        self.show_full_path = !self.show_full_path;
    }

    pub fn reveal_selected(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        self.show_full_path = true;
        self.status_message = match cards::reveal_in_file_manager(Path::new(&card.full_path)) {
            Ok(()) => Some(format!("Opened folder of {}", card.name)),
            Err(e) => {
                warn!("Failed to open file manager for {}: {}", card.full_path, e);
                Some(format!("Could not open file manager: {}", e))
            }
        };
    }

    pub fn copy_selected_path(&mut self) {
        let Some(card) = self.selected_card() else {
            return;
        };
        self.status_message = match cards::copy_text_to_clipboard(&card.full_path) {
            Ok(()) => Some("Path copied to clipboard".to_string()),
            Err(e) => {
                warn!("Failed to copy path to clipboard: {}", e);
                Some(format!("Could not copy path: {}", e))
            }
        };
    }
}

pub fn run(view: CatalogView) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, SetTitle("reeltag"), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(view);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}

fn handle_key_event(
    app: &mut App,
    key: crossterm::event::KeyEvent,
) -> Result<Option<bool>, Box<dyn Error>> {
    // Filter out key release events to prevent duplicate input on Windows
    if key.kind == KeyEventKind::Release {
        return Ok(None);
    }

    if app.show_tag_popup {
        match key.code {
            KeyCode::Esc => app.close_tag_popup(),
            KeyCode::Enter => app.apply_tag_popup(),
            KeyCode::Down | KeyCode::Char('j') => app.tag_popup_next(),
            KeyCode::Up | KeyCode::Char('k') => app.tag_popup_previous(),
            _ => {}
        }
        return Ok(None);
    }

    if app.search_input_mode {
        match key.code {
            KeyCode::Esc => app.search_input_mode = false,
            KeyCode::Enter => {
                app.search_input_mode = false;
                app.apply_search();
            }
            KeyCode::Backspace => app.remove_char_from_search(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.clear_search();
            }
            KeyCode::Char(c) => app.add_char_to_search(c),
            _ => {}
        }
        return Ok(None);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(Some(true)),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Ok(Some(true));
        }
        KeyCode::Down | KeyCode::Char('j') => app.next(),
        KeyCode::Up | KeyCode::Char('k') => app.previous(),
        KeyCode::Char('/') => app.search_input_mode = true,
        KeyCode::Char('t') => app.open_tag_popup(),
        KeyCode::Char('x') => app.clear_tag(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('p') => app.toggle_full_path(),
        KeyCode::Enter | KeyCode::Char('o') => app.reveal_selected(),
        KeyCode::Char('y') => app.copy_selected_path(),
        _ => {}
    }

    Ok(None)
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        update_cursor_visibility(terminal, app)?;

        let now = Instant::now();
        if event::poll(app.next_poll_timeout(now))?
            && let Event::Key(key) = event::read()?
            && let Some(should_quit) = handle_key_event(app, key)?
            && should_quit
        {
            return Ok(());
        }

        app.tick(Instant::now());
    }
}

fn update_cursor_visibility<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &App,
) -> Result<(), Box<dyn Error>> {
    if app.search_input_mode {
        terminal.show_cursor()?;
    } else {
        terminal.hide_cursor()?;
    }
    Ok(())
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Summary
                Constraint::Min(5),    // Cards + detail
                Constraint::Length(3), // Tag/Search
                Constraint::Length(3), // Controls
            ]
            .as_ref(),
        )
        .split(f.area());

    render_summary(f, chunks[0], app);

    let state = app.view.state.clone();
    if state == ViewState::Loaded && !app.view.visible().is_empty() {
        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(68), Constraint::Percentage(32)].as_ref())
            .split(chunks[1]);
        render_cards(f, content[0], app);
        render_detail(f, content[1], app);
    } else {
        render_placeholder(f, chunks[1], app, &state);
    }

    render_tag_and_search_sections(f, chunks[2], app);
    render_controls(f, chunks[3], app);

    if app.show_tag_popup {
        render_tag_popup(f, app);
    }
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let text = match app.view.state {
        ViewState::Loaded | ViewState::Empty => app.view.summary_line(),
        ViewState::Loading => "Loading catalog...".to_string(),
        ViewState::Unavailable { .. } => "Catalog unavailable".to_string(),
    };

    let paragraph = Paragraph::new(text)
        .style(
            Style::default()
                .fg(app.colors.header_fg)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .title(format!("reeltag | {}", app.view.location()))
                .borders(Borders::ALL)
                .border_style(Style::new().fg(app.colors.footer_border_color)),
        );
    f.render_widget(paragraph, area);
}

fn tag_chips(tags: &[String]) -> Line<'static> {
    let mut spans = Vec::with_capacity(tags.len() * 2);
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(
            format!(" {} ", tag),
            Style::default()
                .fg(Color::Black)
                .bg(CHIP_COLORS[i % CHIP_COLORS.len()]),
        ));
    }
    Line::from(spans)
}

fn render_cards(f: &mut Frame, area: Rect, app: &mut App) {
    let header_style = Style::default()
        .fg(app.colors.header_fg)
        .bg(app.colors.header_bg);
    let selected_row_style = Style::default()
        .add_modifier(Modifier::REVERSED)
        .fg(app.colors.selected_style_fg);

    let header = Row::new(
        ["#", "Name", "Size", "Length", "Tags", "Path"]
            .into_iter()
            .map(Cell::from)
            .collect::<Vec<_>>(),
    )
    .style(header_style)
    .height(1);

    let rows: Vec<Row> = app
        .view
        .cards()
        .into_iter()
        .enumerate()
        .map(|(i, card)| {
            let color = match i % 2 {
                0 => app.colors.normal_row_color,
                _ => app.colors.alt_row_color,
            };
            Row::new(vec![
                Cell::from(card.badge),
                Cell::from(card.name),
                Cell::from(card.size),
                Cell::from(card.duration),
                Cell::from(tag_chips(&card.tags)),
                Cell::from(card.short_path),
            ])
            .style(Style::new().fg(app.colors.row_fg).bg(color))
            .height(1)
        })
        .collect();

    let t = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(25),
            Constraint::Length(11),
            Constraint::Length(22),
            Constraint::Percentage(25),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .bg(app.colors.buffer_bg)
    .row_highlight_style(selected_row_style)
    .block(
        Block::default()
            .title("Files")
            .borders(Borders::ALL)
            .border_style(Style::new().fg(app.colors.footer_border_color)),
    );
    f.render_stateful_widget(t, area, &mut app.state);
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title("Details (p: full path, o: reveal, y: copy)")
        .borders(Borders::ALL)
        .border_style(Style::new().fg(app.colors.footer_border_color));

    let Some(card) = app.selected_card() else {
        f.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let path = if app.show_full_path {
        card.full_path.clone()
    } else {
        card.short_path.clone()
    };
    let label = Style::default().fg(app.colors.selected_style_fg);

    let lines = vec![
        Line::from(vec![
            Span::styled(format!("{} ", card.badge), label),
            Span::styled(card.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Size:   ", label), Span::raw(card.size.clone())]),
        Line::from(vec![Span::styled("Length: ", label), Span::raw(card.duration.clone())]),
        Line::from(vec![Span::styled("Path:   ", label), Span::raw(path)]),
        Line::from(""),
        tag_chips(&card.tags),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().fg(app.colors.row_fg))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn render_placeholder(f: &mut Frame, area: Rect, app: &App, state: &ViewState) {
    let (title, lines, color) = match state {
        ViewState::Unavailable { location, reason } => (
            "Catalog unavailable",
            vec![
                Line::from(format!("Could not load {}", location)),
                Line::from(reason.clone()),
                Line::from(""),
                Line::from("Press r to retry"),
            ],
            Color::Red,
        ),
        ViewState::Empty => (
            "No files found",
            vec![
                Line::from("The catalog is empty."),
                Line::from("Run `reeltag build` to populate it, then press r."),
            ],
            Color::Yellow,
        ),
        ViewState::Loading => ("Loading", vec![Line::from("Loading catalog...")], app.colors.row_fg),
        ViewState::Loaded => (
            "No results",
            vec![
                Line::from("No files match the current filters."),
                Line::from("Change the tag (t / x) or the search (/)."),
            ],
            app.colors.row_fg,
        ),
    };

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::new().fg(color)),
        );
    f.render_widget(paragraph, area);
}

fn render_tag_and_search_sections(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(area);

    let tag_text = app
        .view
        .filter
        .tag
        .clone()
        .unwrap_or_else(|| "All tags".to_string());
    let tag_paragraph = Paragraph::new(tag_text)
        .style(Style::default().fg(app.colors.row_fg))
        .block(
            Block::default()
                .title("Tag (t)")
                .borders(Borders::ALL)
                .border_style(Style::new().fg(app.colors.footer_border_color)),
        );
    f.render_widget(tag_paragraph, chunks[0]);

    let search_text = if app.search_input.is_empty() && !app.search_input_mode {
        "Search names, paths and tags".to_string()
    } else {
        app.search_input.clone()
    };

    let search_style = if app.search_input_mode {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.colors.row_fg)
    };

    let search_title = if app.search_debounce.is_pending() {
        "Search (/) ..."
    } else {
        "Search (/)"
    };
    let search_block = Block::default()
        .title(search_title)
        .borders(Borders::ALL)
        .border_style(Style::new().fg(if app.search_input_mode {
            Color::Green
        } else {
            app.colors.footer_border_color
        }));

    f.render_widget(
        Paragraph::new(search_text)
            .block(search_block)
            .style(search_style)
            .alignment(Alignment::Left),
        chunks[1],
    );

    if app.search_input_mode {
        let cursor_x = chunks[1].x + 1 + app.search_input.chars().count() as u16;
        let cursor_y = chunks[1].y + 1;
        f.set_cursor_position((cursor_x, cursor_y));
    }
}

fn render_controls(f: &mut Frame, area: Rect, app: &App) {
    let text = match &app.status_message {
        Some(message) => message.clone(),
        None if app.search_input_mode => {
            "Enter: apply | Esc: leave search | Ctrl+C: clear search".to_string()
        }
        None => "j/k: move | /: search | t: tag | x: clear tag | r: reload | o: reveal | y: copy path | q: quit"
            .to_string(),
    };

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(app.colors.row_fg))
        .block(
            Block::default()
                .title("Controls")
                .borders(Borders::ALL)
                .border_style(Style::new().fg(app.colors.footer_border_color)),
        );
    f.render_widget(paragraph, area);
}

fn render_tag_popup(f: &mut Frame, app: &App) {
    let area = centered_rect(40, 60, f.area());

    let block = Block::default()
        .title("Select tag")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let options = std::iter::once("All tags".to_string()).chain(app.view.vocabulary().iter().cloned());
    let items: Vec<ListItem> = options
        .enumerate()
        .map(|(i, option)| {
            let style = if i == app.tag_popup_selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(option).style(style)
        })
        .collect();

    // Keep the highlighted option on screen.
    let visible_rows = area.height.saturating_sub(2) as usize;
    let skip = app
        .tag_popup_selected
        .saturating_sub(visible_rows.saturating_sub(1));
    let list = List::new(items.into_iter().skip(skip).collect::<Vec<_>>()).block(block);

    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

/// Helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, entry};
    use crate::storage::LocalFileStore;
    use ratatui::backend::TestBackend;

    fn app_with(entries: &[catalog::CatalogEntry]) -> (App, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("files_data.json");
        catalog::write_catalog(&path, entries).unwrap();
        let view = CatalogView::new(Box::new(LocalFileStore::new(path)));
        (App::new(view), dir)
    }

    #[test]
    fn test_search_applies_after_debounce() {
        let (mut app, _dir) = app_with(&[entry("A-1", "/v/A-1.mp4"), entry("B-2", "/v/B-2.mp4")]);
        assert_eq!(app.view.visible().len(), 2);

        app.search_input_mode = true;
        app.add_char_to_search('b');
        // Nothing happens before the quiet period ends.
        app.tick(Instant::now());
        assert_eq!(app.view.visible().len(), 2);

        app.tick(Instant::now() + SEARCH_DEBOUNCE + Duration::from_millis(1));
        assert_eq!(app.view.visible().len(), 1);
        assert_eq!(app.selected_card().unwrap().name, "B-2");
    }

    #[test]
    fn test_tag_popup_selection_composes_with_search() {
        let (mut app, _dir) = app_with(&[
            entry("A-1", "/v/A-1.mp4"),
            entry("B-2", "/v/B-2.mp4"),
            entry("A-2", "/v/A-2.mp4"),
        ]);

        app.open_tag_popup();
        assert_eq!(app.tag_popup_selected, 0);
        // Vocabulary: 1, 2, A, B
        app.tag_popup_next();
        app.tag_popup_next();
        app.tag_popup_next();
        app.apply_tag_popup();
        assert_eq!(app.view.filter.tag.as_deref(), Some("A"));
        assert_eq!(app.view.visible().len(), 2);

        app.search_input = "2".to_string();
        app.apply_search();
        assert_eq!(app.view.visible().len(), 1);
        assert_eq!(app.selected_card().unwrap().badge, "#1");

        app.clear_tag();
        assert_eq!(app.view.visible().len(), 2);
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let (mut app, _dir) = app_with(&[entry("A-1", "/a"), entry("B-2", "/b")]);
        app.previous();
        assert_eq!(app.state.selected(), Some(0));
        app.next();
        app.next();
        assert_eq!(app.state.selected(), Some(1));
    }

    #[test]
    fn test_unavailable_catalog_renders_error_state() {
        let dir = tempfile::tempdir().unwrap();
        let view = CatalogView::new(Box::new(LocalFileStore::new(
            dir.path().join("missing.json"),
        )));
        let mut app = App::new(view);
        assert!(matches!(app.view.state, ViewState::Unavailable { .. }));
        assert!(app.selected_card().is_none());

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Press r to retry"));
    }

    #[test]
    fn test_loaded_catalog_renders_badges() {
        let (mut app, _dir) = app_with(&[entry("anime-op", "/v/anime-op.mp4")]);
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|f| ui(f, &mut app)).unwrap();
        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("#1"));
        assert!(rendered.contains("Total Files: 1"));
    }
}
