//! Ratatui-based terminal UI.
//!
//! The TUI provides a property form, the latest estimate with its confidence
//! band, an on-demand AI market analysis, and the regional price trend chart.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use tracing::{info, warn};

use crate::app::session::{NarrativeState, Session};
use crate::cli::TuiArgs;
use crate::config::AppConfig;
use crate::domain::{MIN_YEAR_BUILT, PropertyFeatures};
use crate::error::AppError;
use crate::market::{MARKET_TRENDS, summarize};
use crate::narrative::{GeminiClient, NarrativeError};
use crate::report::{format_breakdown, format_currency};

mod form;
mod trend_chart;

use form::Field;
use trend_chart::TrendChart;

/// Start the TUI.
pub fn run(args: TuiArgs, config: &AppConfig) -> Result<(), AppError> {
    let as_of_year = resolve_as_of_year(args.as_of_year)?;
    let (narrator, note) = if args.no_ai {
        (None, Some("AI analysis off (--no-ai).".to_string()))
    } else {
        match GeminiClient::from_env(&config.narrative) {
            Ok(client) => (Some(client), None),
            Err(err) => {
                warn!(error = %err, "AI analysis unavailable");
                (None, Some(disabled_note(&err)))
            }
        }
    };

    let mut app = App::new(args.features.to_features(), as_of_year, narrator);
    if let Some(note) = note {
        app.status = note;
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    features: PropertyFeatures,
    as_of_year: i32,
    selected_field: usize,
    /// Text buffer while a field is being typed into.
    editing: Option<String>,
    /// The form changed since the last estimate.
    stale: bool,
    show_breakdown: bool,
    narrative_scroll: u16,
    pending_analysis: bool,
    status: String,
    narrator: Option<GeminiClient>,
    session: Session,
}

impl App {
    fn new(features: PropertyFeatures, as_of_year: i32, narrator: Option<GeminiClient>) -> Self {
        let mut app = Self {
            features,
            as_of_year,
            selected_field: 0,
            editing: None,
            stale: false,
            show_breakdown: false,
            narrative_scroll: 0,
            pending_analysis: false,
            status: String::new(),
            narrator,
            session: Session::new(),
        };
        app.value();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            // The busy status is on screen now; the request itself blocks.
            if self.pending_analysis {
                self.pending_analysis = false;
                self.run_analysis();
                needs_redraw = true;
                continue;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn selected(&self) -> Field {
        Field::ALL[self.selected_field]
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing.is_some() {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                self.selected_field = self.selected_field.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_field + 1 < Field::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                let field = self.selected();
                self.editing = Some(field.raw(&self.features));
                self.status = format!("Editing {}. Enter to apply, Esc to cancel.", field.label().to_lowercase());
            }
            KeyCode::Char('v') => self.value(),
            KeyCode::Char('a') => self.request_analysis(),
            KeyCode::Char('b') => self.show_breakdown = !self.show_breakdown,
            KeyCode::PageDown => self.narrative_scroll = self.narrative_scroll.saturating_add(5),
            KeyCode::PageUp => self.narrative_scroll = self.narrative_scroll.saturating_sub(5),
            _ => {}
        }
        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        let field = self.selected();
        let Some(buffer) = self.editing.as_mut() else {
            return;
        };
        match code {
            KeyCode::Esc => {
                self.editing = None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let input = std::mem::take(buffer);
                self.editing = None;
                match field.apply(&mut self.features, &input) {
                    Ok(()) => {
                        self.stale = true;
                        self.status = format!("{}: {}", field.label(), field.display(&self.features));
                    }
                    Err(msg) => self.status = msg,
                }
            }
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char(c) if field.accepts(c) => buffer.push(c),
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        let field = self.selected();
        field.step(&mut self.features, delta, self.as_of_year);
        self.stale = true;
        self.status = format!("{}: {}", field.label(), field.display(&self.features));
    }

    fn value(&mut self) {
        match self.session.value(self.features.clone(), self.as_of_year) {
            Ok(last) => {
                self.status = format!("Estimated {}", format_currency(last.valuation.point_estimate));
                self.stale = false;
                self.narrative_scroll = 0;
            }
            Err(err) => {
                self.status = format!("Invalid property features: {err}");
            }
        }
    }

    fn request_analysis(&mut self) {
        if self.narrator.is_none() {
            self.status = "AI analysis is unavailable in pricing-only mode.".to_string();
            return;
        }
        if self.stale || self.session.last().is_none() {
            self.value();
            if self.stale || self.session.last().is_none() {
                return;
            }
        }
        self.pending_analysis = true;
        self.status = "Generating analysis…".to_string();
    }

    fn run_analysis(&mut self) {
        let Some(client) = self.narrator.as_ref() else {
            return;
        };
        info!(model = client.model(), "generating AI analysis");
        self.narrative_scroll = 0;
        self.status = match self.session.explain(client) {
            Some(NarrativeState::Ready(_)) => "Analysis ready. PgUp/PgDn to scroll.".to_string(),
            Some(NarrativeState::Failed(err)) => format!("Market analysis failed: {err}"),
            Some(NarrativeState::NotRequested) | None => "No estimate to analyze.".to_string(),
        };
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let ai = match &self.narrator {
            Some(client) => format!("AI: {}", client.model()),
            None => "AI: off".to_string(),
        };
        let line = Line::from(vec![
            Span::styled("prophet", Style::default().fg(Color::Cyan)),
            Span::raw(" · property valuation"),
            Span::styled(
                format!("  | as of {} | {ai}", self.as_of_year),
                Style::default().fg(Color::Gray),
            ),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(40), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(Field::ALL.len() as u16 + 2), Constraint::Min(0)])
            .split(columns[0]);
        self.draw_form(frame, left[0]);
        self.draw_result(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(6), Constraint::Length(14)])
            .split(columns[1]);
        self.draw_narrative(frame, right[0]);
        self.draw_chart(frame, right[1]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items = Field::ALL
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let value = match &self.editing {
                    Some(buffer) if i == self.selected_field => format!("{buffer}_"),
                    _ => field.display(&self.features),
                };
                ListItem::new(format!("{:<12} {value}", field.label()))
            })
            .collect::<Vec<_>>();

        let list = List::new(items)
            .block(Block::default().title("Property").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Estimate").borders(Borders::ALL);
        let Some(last) = self.session.last() else {
            let msg = Paragraph::new("No estimate yet. Press v to value the property.")
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(msg, area);
            return;
        };

        let v = &last.valuation;
        let mut lines = vec![
            Line::from(Span::styled(
                format_currency(v.point_estimate),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "range {} - {}",
                format_currency(v.confidence_low),
                format_currency(v.confidence_high)
            )),
            Line::from(Span::styled(
                format!("as of {}", last.as_of_year),
                Style::default().fg(Color::Gray),
            )),
        ];
        if self.stale {
            lines.push(Line::from(Span::styled(
                "Form changed. Press v to re-value.",
                Style::default().fg(Color::Yellow),
            )));
        }
        if self.show_breakdown {
            lines.push(Line::from(""));
            lines.extend(format_breakdown(&v.breakdown).lines().map(|l| Line::from(l.to_string())));
        }

        let p = Paragraph::new(Text::from(lines)).block(block);
        frame.render_widget(p, area);
    }

    fn draw_narrative(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("AI market analysis").borders(Borders::ALL);
        let (text, style) = match self.session.last().map(|l| &l.narrative) {
            Some(NarrativeState::Ready(text)) => (text.clone(), Style::default()),
            Some(NarrativeState::Failed(err)) => {
                (format!("Market analysis failed: {err}"), Style::default().fg(Color::Red))
            }
            _ if self.narrator.is_none() => (
                "Pricing-only mode. Set the API key and restart for an AI analysis.".to_string(),
                Style::default().fg(Color::Gray),
            ),
            _ => ("Press a to generate an analysis.".to_string(), Style::default().fg(Color::Gray)),
        };

        let p = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((self.narrative_scroll, 0))
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let title = match summarize(&MARKET_TRENDS) {
            Some(s) => format!(
                "Regional avg price ({:+.1}% over 12 mo, {} sales)",
                s.change_pct, s.total_volume
            ),
            None => "Regional avg price".to_string(),
        };
        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);
        frame.render_widget(TrendChart::new(&MARKET_TRENDS), inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  v value  a analysis  b breakdown  PgUp/PgDn scroll  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// The pricing year for the session. Nothing can be built before `MIN_YEAR_BUILT`.
fn resolve_as_of_year(requested: Option<i32>) -> Result<i32, AppError> {
    let year = requested.unwrap_or_else(crate::app::current_year);
    if year < MIN_YEAR_BUILT {
        return Err(AppError::usage(format!(
            "--as-of-year must be {MIN_YEAR_BUILT} or later (got {year})"
        )));
    }
    Ok(year)
}

/// Status line shown when the analysis client could not be created.
fn disabled_note(err: &NarrativeError) -> String {
    match err {
        NarrativeError::MissingCredential { var } => format!("{var} not set: pricing-only mode."),
        other => format!("AI analysis disabled: {other}"),
    }
}
