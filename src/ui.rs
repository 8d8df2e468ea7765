//! Terminal rendering.
//!
//! One `render` call per frame. The renderer also measures the table
//! viewport and writes it back to the app, which the sentinel check uses
//! on the same iteration of the event loop.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table};
use ratatui::Frame;

use crate::api::StatusFilter;
use crate::app::{App, Focus};
use crate::feed::FeedPhase;
use crate::i18n::{Language, UiStrings};
use crate::view::{self, RowTreatment, SortKey};

// Row backgrounds for the three status treatments.
const ALIVE_BG: Color = Color::Rgb(0xd4, 0xed, 0xda);
const DEAD_BG: Color = Color::Rgb(0xf8, 0xd7, 0xda);
const NEUTRAL_BG: Color = Color::Rgb(0xed, 0xec, 0xec);
// Dark text, readable on all three backgrounds.
const ROW_FG: Color = Color::Rgb(0x21, 0x25, 0x29);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

fn spinner_char(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

pub fn render(frame: &mut Frame, app: &mut App) {
    match app.feed.phase() {
        FeedPhase::LoadingFirstPage => render_loading_screen(frame, app),
        FeedPhase::Error => render_error_screen(frame, app),
        FeedPhase::Ready | FeedPhase::LoadingMore => render_browser(frame, app),
    }
}

fn render_loading_screen(frame: &mut Frame, app: &App) {
    let strings = app.strings();
    let area = centered_rect(40, 3, frame.area());
    let text = format!("{} {}", spinner_char(app.spinner_frame), strings.loading);

    frame.render_widget(
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_error_screen(frame: &mut Frame, app: &App) {
    let strings = app.strings();
    let area = centered_rect(60, 7, frame.area());
    let detail = app.feed.fatal_error().unwrap_or_default().to_string();

    let lines = vec![
        Line::from(Span::styled(
            strings.error,
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(detail, Style::default().fg(Color::DarkGray))),
        Line::default(),
        Line::from(Span::styled(
            strings.hint_quit,
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        ),
        area,
    );
}

fn render_browser(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(3), // filter bar
            Constraint::Min(5),    // table
            Constraint::Length(1), // status line
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let filter_fields = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    render_header(frame, app, chunks[0]);
    render_filter_bar(frame, app, &filter_fields);
    render_table(frame, app, chunks[2]);
    render_status_line(frame, app, chunks[3]);
    render_footer(frame, app, chunks[4]);
    render_suggestions_popup(frame, app, filter_fields[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    frame.render_widget(
        Paragraph::new(Span::styled(
            app.strings().app_title,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_filter_bar(frame: &mut Frame, app: &App, fields: &[Rect]) {
    let strings = app.strings();

    let status = selector_text(
        status_label(strings, app.feed.filter().status),
        app.focus == Focus::Status,
    );
    frame.render_widget(
        Paragraph::new(status).block(field_block(strings.status, app.focus == Focus::Status)),
        fields[0],
    );

    let species = if app.species_input.is_empty() {
        Span::styled(
            strings.enter_species,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::raw(app.species_input.as_str())
    };
    frame.render_widget(
        Paragraph::new(species).block(field_block(strings.species, app.focus == Focus::Species)),
        fields[1],
    );
    if app.focus == Focus::Species {
        let cursor_x = fields[1].x + 1 + app.species_input.chars().count() as u16;
        frame.set_cursor_position(Position::new(
            cursor_x.min(fields[1].right().saturating_sub(2)),
            fields[1].y + 1,
        ));
    }

    let sort = selector_text(sort_label(strings, app.sort), app.focus == Focus::Sort);
    frame.render_widget(
        Paragraph::new(sort).block(field_block(strings.sort_by, app.focus == Focus::Sort)),
        fields[2],
    );
}

fn render_table(frame: &mut Frame, app: &mut App, area: Rect) {
    let strings = app.strings();

    // Block borders take two rows, the header takes one.
    let viewport = area.height.saturating_sub(3) as usize;
    app.viewport_rows = viewport;

    let characters = app.sorted_rows();
    let start = app.scroll.min(characters.len());
    let end = (app.scroll + viewport).min(characters.len());

    let mut rows: Vec<Row> = characters[start..end]
        .iter()
        .map(|character| {
            let bg = match view::row_treatment(&character.status) {
                RowTreatment::Alive => ALIVE_BG,
                RowTreatment::Dead => DEAD_BG,
                RowTreatment::Neutral => NEUTRAL_BG,
            };
            Row::new(vec![
                Cell::from(character.name.clone()),
                Cell::from(character.status.clone()),
                Cell::from(character.species.clone()),
                Cell::from(character.gender.clone()),
                Cell::from(character.origin.name.clone()),
            ])
            .style(Style::default().bg(bg).fg(ROW_FG))
        })
        .collect();

    // The sentinel slot right after the last row carries the load-more
    // spinner while a page is on its way.
    let sentinel = characters.len();
    if app.feed.in_flight() && sentinel >= app.scroll && sentinel < app.scroll + viewport {
        rows.push(Row::new(vec![Cell::from(format!(
            "{} {}",
            spinner_char(app.spinner_frame),
            strings.load_more
        ))]));
    }

    let header = Row::new(vec![
        Cell::from(strings.name),
        Cell::from(strings.status),
        Cell::from(strings.species),
        Cell::from(strings.gender),
        Cell::from(strings.origin),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(12),
        Constraint::Percentage(18),
        Constraint::Percentage(14),
        Constraint::Percentage(28),
    ];

    frame.render_widget(
        Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .block(field_block("", app.focus == Focus::Table)),
        area,
    );
}

fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let strings = app.strings();
    let count = app.feed.characters().len();

    let mut spans = vec![Span::styled(
        strings.row_count.replace("{count}", &count.to_string()),
        Style::default().fg(Color::DarkGray),
    )];
    if app.feed.last_error().is_some() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(strings.error, Style::default().fg(Color::Red)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let strings = app.strings();
    let active = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let inactive = Style::default().fg(Color::DarkGray);

    let spans = vec![
        Span::styled(strings.hint_navigation, inactive),
        Span::raw("  "),
        Span::styled(
            format!("F2 {}", strings.english),
            if app.language == Language::ENGLISH {
                active
            } else {
                inactive
            },
        ),
        Span::raw(" "),
        Span::styled(
            format!("F3 {}", strings.german),
            if app.language == Language::GERMAN {
                active
            } else {
                inactive
            },
        ),
        Span::raw("  "),
        Span::styled(strings.hint_quit, inactive),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Completion popup anchored under the species field, drawn over the table.
fn render_suggestions_popup(frame: &mut Frame, app: &App, species_field: Rect) {
    if app.focus != Focus::Species || app.suggestions.is_empty() {
        return;
    }

    let wanted = app.suggestions.len() as u16 + 2;
    let available = frame.area().height.saturating_sub(species_field.bottom());
    let popup = Rect::new(
        species_field.x,
        species_field.bottom(),
        species_field.width,
        wanted.min(available),
    );
    if popup.height < 3 {
        return;
    }

    let items: Vec<ListItem> = app
        .suggestions
        .iter()
        .enumerate()
        .map(|(index, word)| {
            let item = ListItem::new(*word);
            if app.suggestion_cursor == Some(index) {
                item.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        popup,
    );
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn selector_text(label: &'static str, focused: bool) -> Line<'static> {
    if focused {
        Line::from(vec![
            Span::styled("◂ ", Style::default().fg(Color::Yellow)),
            Span::raw(label),
            Span::styled(" ▸", Style::default().fg(Color::Yellow)),
        ])
    } else {
        Line::from(label)
    }
}

fn status_label(strings: &UiStrings, status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::All => strings.all,
        StatusFilter::Alive => strings.alive,
        StatusFilter::Dead => strings.dead,
        StatusFilter::Unknown => strings.unknown,
    }
}

fn sort_label(strings: &UiStrings, sort: SortKey) -> &'static str {
    match sort {
        SortKey::None => strings.none,
        SortKey::Name => strings.name,
        SortKey::Origin => strings.origin,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Character, CharactersPage, Origin, PageInfo};
    use crate::app::FetchOutcome;
    use crate::config::Config;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn test_app() -> App {
        let config = Config {
            api_url: "http://127.0.0.1:9".to_string(),
            load_more_delay_ms: 0,
            request_timeout_secs: 1,
            language: "en".to_string(),
            log_dir: None,
            tick_ms: 120,
        };
        let (app, _rx) = App::new(config).expect("app builds");
        app
    }

    fn page_of(names: &[&str], next: Option<u32>) -> CharactersPage {
        CharactersPage {
            info: PageInfo { next },
            results: names
                .iter()
                .enumerate()
                .map(|(i, name)| Character {
                    id: i.to_string(),
                    name: (*name).to_string(),
                    status: "Alive".to_string(),
                    species: "Human".to_string(),
                    gender: "Male".to_string(),
                    origin: Origin {
                        name: "Earth".to_string(),
                    },
                })
                .collect(),
        }
    }

    fn loaded_app(names: &[&str], next: Option<u32>) -> App {
        let mut app = test_app();
        let request = app.feed.reset_pagination();
        app.on_fetch_outcome(FetchOutcome::Loaded {
            request,
            page: page_of(names, next),
        });
        app
    }

    fn draw(app: &mut App) -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|frame| render(frame, app)).expect("draw");
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    // ==================== Screen Selection Tests ====================

    #[test]
    fn test_first_load_renders_loading_screen() {
        let mut app = test_app();
        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("Loading"));
        assert!(!screen.contains("Rick and Morty Characters"));
    }

    #[test]
    fn test_fatal_error_renders_error_screen() {
        let mut app = test_app();
        let request = app.feed.reset_pagination();
        app.on_fetch_outcome(FetchOutcome::Failed {
            request,
            message: "connection refused".to_string(),
        });

        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("An error has occurred"));
        assert!(screen.contains("connection refused"));
    }

    #[test]
    fn test_error_screen_is_localized() {
        let mut app = test_app();
        app.language = Language::GERMAN;
        let request = app.feed.reset_pagination();
        app.on_fetch_outcome(FetchOutcome::Failed {
            request,
            message: "timeout".to_string(),
        });

        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("Ein Fehler ist aufgetreten"));
    }

    // ==================== Browser Screen Tests ====================

    #[test]
    fn test_browser_shows_title_rows_and_count() {
        let mut app = loaded_app(&["Rick Sanchez", "Morty Smith"], Some(2));
        let screen = screen_text(&draw(&mut app));

        assert!(screen.contains("Rick and Morty Characters"));
        assert!(screen.contains("Rick Sanchez"));
        assert!(screen.contains("Morty Smith"));
        assert!(screen.contains("2 characters loaded"));
    }

    #[test]
    fn test_browser_chrome_follows_language() {
        let mut app = loaded_app(&["Rick Sanchez"], None);
        app.language = Language::GERMAN;
        let screen = screen_text(&draw(&mut app));

        assert!(screen.contains("Rick und Morty Charaktere"));
        assert!(screen.contains("Herkunft"));
        assert!(screen.contains("1 Charaktere geladen"));
        // Data rows stay as the API returned them.
        assert!(screen.contains("Rick Sanchez"));
    }

    #[test]
    fn test_renderer_reports_table_viewport() {
        let mut app = loaded_app(&["Rick"], None);
        draw(&mut app);
        // 24 total minus header 3, filter 3, status 1, footer 1 leaves a
        // 16-row table area; borders and table header leave 13 data rows.
        assert_eq!(app.viewport_rows, 13);
    }

    #[test]
    fn test_spinner_row_shown_while_loading_more() {
        let mut app = loaded_app(&["Rick"], Some(2));
        app.viewport_rows = 13;
        app.feed.next_page_request().expect("marks in flight");

        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("Load more"));
    }

    #[test]
    fn test_no_spinner_row_when_idle() {
        let mut app = loaded_app(&["Rick"], Some(2));
        let screen = screen_text(&draw(&mut app));
        assert!(!screen.contains("Load more"));
    }

    #[test]
    fn test_load_more_failure_message_on_status_line() {
        let mut app = loaded_app(&["Rick"], Some(2));
        let request = crate::feed::PageRequest {
            page: 2,
            generation: 1,
            filter: app.feed.filter().clone(),
        };
        app.on_fetch_outcome(FetchOutcome::Failed {
            request,
            message: "HTTP 500".to_string(),
        });

        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("Rick"));
        assert!(screen.contains("An error has occurred"));
    }

    #[test]
    fn test_scroll_offsets_visible_rows() {
        let names: Vec<String> = (1..=30).map(|i| format!("Character {i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut app = loaded_app(&refs, Some(2));

        app.scroll = 10;
        let screen = screen_text(&draw(&mut app));
        assert!(!screen.contains("Character 01"));
        assert!(screen.contains("Character 11"));
    }

    // ==================== Suggestions Popup Tests ====================

    #[test]
    fn test_suggestions_popup_lists_matches() {
        let mut app = loaded_app(&["Rick"], None);
        app.focus = Focus::Species;
        app.species_input = "hu".to_string();
        app.suggestions = vec!["human", "humanoid"];
        app.suggestion_cursor = Some(1);

        let screen = screen_text(&draw(&mut app));
        assert!(screen.contains("human"));
        assert!(screen.contains("humanoid"));
    }

    #[test]
    fn test_popup_hidden_when_focus_leaves_species() {
        let mut app = loaded_app(&["Rick"], None);
        app.focus = Focus::Table;
        app.suggestions = vec!["humanoid"];

        let screen = screen_text(&draw(&mut app));
        assert!(!screen.contains("humanoid"));
    }

    // ==================== Helper Tests ====================

    #[test]
    fn test_spinner_wraps_around() {
        assert_eq!(spinner_char(0), spinner_char(SPINNER_FRAMES.len()));
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 6, area);
        assert!(rect.x >= area.x && rect.right() <= area.right());
        assert!(rect.y >= area.y && rect.bottom() <= area.bottom());
    }
}
