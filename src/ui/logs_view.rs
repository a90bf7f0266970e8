use crate::calc::range::{month_of, step, DateRange, ViewMode};
use crate::calc::summary::{summarize_range, RangeSummary};
use crate::data::{AppSettings, ProjectData, TimeLog, TimeLogData};
use crate::ui::picker::{PickerAction, RangePicker};
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io::Stdout;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

const SECTION_BG: Color = Color::Rgb(40, 44, 52);

#[derive(PartialEq)]
enum Mode {
    Normal,
    Add,
}

pub struct App<'a> {
    log_data: &'a mut TimeLogData,
    project_data: &'a ProjectData,
    pub settings: AppSettings,
    /// The committed range scoping everything on screen. Only Apply in the
    /// picker or the top-bar n/p step replaces it.
    range: DateRange,
    picker: RangePicker,
    summary: RangeSummary,
    list_cursor: usize,
    mode: Mode,
    /// 0 = browsing; 1–N = entering add field N.
    add_stage: u8,
    field_bufs: Vec<String>,
    input_buffer: String,
    today: NaiveDate,
    table_state: TableState,
    /// Shown in the footer, like the data-dir line of the stats screens.
    data_dir: PathBuf,
}

const ADD_LABELS: [&str; 5] = [
    "Date (YYYY-MM-DD)",
    "Project",
    "Task",
    "Hours",
    "Billable? (y/n)",
];

impl<'a> App<'a> {
    pub fn new(
        log_data: &'a mut TimeLogData,
        project_data: &'a ProjectData,
        settings: AppSettings,
        today: NaiveDate,
        data_dir: PathBuf,
    ) -> Self {
        // The page opens scoped to the current calendar month, which the
        // picker will infer as Month view.
        let range = month_of(today);
        let mut picker = RangePicker::new(today);
        picker.sync(range);
        let summary = summarize_range(log_data, range);
        App {
            log_data,
            project_data,
            settings,
            range,
            picker,
            summary,
            list_cursor: 0,
            mode: Mode::Normal,
            add_stage: 0,
            field_bufs: Vec::new(),
            input_buffer: String::new(),
            today,
            table_state: TableState::default(),
            data_dir,
        }
    }

    fn update_summary(&mut self) {
        self.summary = summarize_range(self.log_data, self.range);
        let len = self.visible_indices().len();
        if self.list_cursor >= len && len > 0 {
            self.list_cursor = len - 1;
        }
        if len == 0 {
            self.list_cursor = 0;
        }
    }

    /// Indices into `log_data.logs` of the entries inside the committed range.
    fn visible_indices(&self) -> Vec<usize> {
        self.log_data
            .logs
            .iter()
            .enumerate()
            .filter(|(_, l)| {
                l.parsed_date()
                    .map(|d| self.range.contains(d))
                    .unwrap_or(false)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Steps the committed range directly, bypassing the popover. Acts on the
    /// committed value even while edits are pending inside the picker, then
    /// re-syncs the picker so a reopen shows the stepped range.
    fn step_committed(&mut self, dir: i32) {
        self.range = step(self.range, self.picker.view, dir);
        self.picker.sync(self.range);
        self.update_summary();
    }

    fn commit(&mut self, range: DateRange) {
        self.range = range;
        self.picker.sync(range);
        self.update_summary();
    }

    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.picker.open {
            match self.picker.handle_key(code) {
                PickerAction::Apply(range) => self.commit(range),
                PickerAction::Cancel | PickerAction::None => {}
            }
            return false;
        }

        match self.mode {
            Mode::Add => {
                self.handle_add_key(code);
                false
            }
            Mode::Normal => match code {
                KeyCode::Char('n') => {
                    self.step_committed(1);
                    false
                }
                KeyCode::Char('p') => {
                    self.step_committed(-1);
                    false
                }
                KeyCode::Char('r') | KeyCode::Enter => {
                    self.picker.open(self.range);
                    false
                }
                KeyCode::Tab => {
                    // The top bar's view tabs; changing tab never recomputes
                    // the range, only how n/p pages it.
                    self.picker.view = self.picker.view.next();
                    false
                }
                KeyCode::Up => {
                    if self.list_cursor > 0 {
                        self.list_cursor -= 1;
                    }
                    false
                }
                KeyCode::Down => {
                    if self.list_cursor + 1 < self.visible_indices().len() {
                        self.list_cursor += 1;
                    }
                    false
                }
                KeyCode::Char('a') => {
                    self.mode = Mode::Add;
                    self.add_stage = 1;
                    self.field_bufs.clear();
                    self.input_buffer = self.today.format("%Y-%m-%d").to_string();
                    false
                }
                KeyCode::Delete | KeyCode::Char('x') => {
                    let visible = self.visible_indices();
                    if let Some(&idx) = visible.get(self.list_cursor) {
                        self.log_data.remove_at(idx);
                        self.update_summary();
                    }
                    false
                }
                KeyCode::Char('q') => true,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => true,
                _ => false,
            },
        }
    }

    fn handle_add_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => {
                self.input_buffer.push(c);
            }
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Enter => {
                match self.add_stage {
                    1 => {
                        if NaiveDate::parse_from_str(&self.input_buffer, "%Y-%m-%d").is_err() {
                            self.input_buffer = "Invalid date, use YYYY-MM-DD".to_string();
                            return;
                        }
                    }
                    4 => {
                        if self.input_buffer.parse::<f64>().is_err() {
                            self.input_buffer = "Invalid hours, use a number".to_string();
                            return;
                        }
                    }
                    _ => {}
                }
                self.field_bufs.push(self.input_buffer.clone());

                if self.add_stage == 5 {
                    self.finish_add();
                } else {
                    let next_stage = self.add_stage + 1;
                    self.input_buffer = match next_stage {
                        2 => self.settings.default_project.clone(),
                        3 => self.settings.default_task.clone(),
                        5 => {
                            let project =
                                self.field_bufs.get(1).map(String::as_str).unwrap_or("");
                            if self.project_data.is_billable(project) {
                                "y".to_string()
                            } else {
                                "n".to_string()
                            }
                        }
                        _ => String::new(),
                    };
                    self.add_stage = next_stage;
                }
            }
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.add_stage = 0;
                self.field_bufs.clear();
                self.input_buffer.clear();
            }
            _ => {}
        }
    }

    fn finish_add(&mut self) {
        // Stages validated on entry: [0]=date, [1]=project, [2]=task,
        // [3]=hours, [4]=billable
        let date = self
            .field_bufs
            .first()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .unwrap_or(self.today);
        let project = self.field_bufs.get(1).map(String::as_str).unwrap_or("");
        let task = self.field_bufs.get(2).map(String::as_str).unwrap_or("");
        let hours = self
            .field_bufs
            .get(3)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);
        let billable = self
            .field_bufs
            .get(4)
            .map(|s| s.to_lowercase().starts_with('y'))
            .unwrap_or(true);

        self.log_data
            .add(TimeLog::new(date, project, task, hours, billable));
        self.mode = Mode::Normal;
        self.add_stage = 0;
        self.field_bufs.clear();
        self.input_buffer.clear();
        self.update_summary();
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&mut self, f: &mut Frame) {
        let size = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),  // top bar: range + view tabs
                Constraint::Min(8),     // log table
                Constraint::Length(12), // range summary
                Constraint::Length(9),  // add form or help + footer
            ])
            .split(size);

        self.render_top_bar(f, chunks[0]);
        self.render_log_table(f, chunks[1]);
        self.render_summary(f, chunks[2]);
        self.render_bottom(f, chunks[3]);

        if self.picker.open {
            self.picker.render(f, size);
        }
    }

    fn render_top_bar(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let range_span = Span::styled(
            format!(
                " {} – {}  ({} days)",
                self.range.from.format("%Y-%m-%d"),
                self.range.to.format("%Y-%m-%d"),
                self.range.span_days(),
            ),
            Style::default().add_modifier(Modifier::BOLD),
        );

        let mut tab_spans = vec![Span::raw("   ")];
        for view in [ViewMode::Day, ViewMode::Week, ViewMode::Month, ViewMode::Range] {
            let style = if view == self.picker.view {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            tab_spans.push(Span::styled(format!(" {} ", view.label()), style));
        }
        tab_spans.push(Span::styled(
            "   ‹ p    n ›",
            Style::default().fg(Color::DarkGray),
        ));

        let mut line1 = vec![range_span];
        line1.extend(tab_spans);
        let lines = vec![
            Line::from(line1),
            Line::from(Span::styled(
                " n/p=step range  Tab=view  r/Enter=edit range",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        f.render_widget(Paragraph::new(lines), area);
    }

    fn render_log_table(&mut self, f: &mut Frame, area: ratatui::layout::Rect) {
        let header_style = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("Date").style(header_style),
            Cell::from("Project").style(header_style),
            Cell::from("Task").style(header_style),
            Cell::from("Hours").style(header_style),
            Cell::from("Billable").style(header_style),
            Cell::from("Notes").style(header_style),
        ]);

        let rows: Vec<Row> = self
            .visible_indices()
            .iter()
            .map(|&i| {
                let l = &self.log_data.logs[i];
                Row::new(vec![
                    Cell::from(l.date.clone()),
                    Cell::from(l.project.clone()),
                    Cell::from(l.task.clone()),
                    Cell::from(format!("{:.2}", l.hours)),
                    Cell::from(if l.billable { "Yes" } else { "No" }),
                    Cell::from(l.notes.clone()),
                ])
            })
            .collect();

        if rows.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(self.list_cursor));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(12),
                Constraint::Length(18),
                Constraint::Length(24),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Time Logs  (a=add  Del/x=delete) "),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_summary(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let s = &self.summary;
        let full_days = if self.settings.day_hours > 0.0 {
            s.total_hours / self.settings.day_hours
        } else {
            0.0
        };

        let mut rows: Vec<Row> = vec![
            section_header("TOTALS"),
            data_row("Entries", plain(format!("{}", s.entries)), plain("")),
            data_row("Days Logged", plain(format!("{}", s.days_logged)), plain("")),
            data_row(
                "Total Hours",
                plain(format!("{:.2}", s.total_hours)),
                plain(format!("{:.1} days", full_days)),
            ),
            data_row(
                "Billable Hours",
                colored(format!("{:.2}", s.billable_hours), Color::Green),
                plain(billable_pct(s)),
            ),
            spacer(),
            section_header("BY PROJECT"),
        ];
        for p in &s.by_project {
            rows.push(data_row(
                p.project.clone(),
                plain(format!("{:.2}", p.hours)),
                plain(format!("{:.2} bill", p.billable_hours)),
            ));
        }

        let table = Table::new(
            rows,
            [
                Constraint::Length(26),
                Constraint::Length(12),
                Constraint::Length(14),
            ],
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Range Summary "),
        );
        f.render_widget(table, area);
    }

    fn render_bottom(&self, f: &mut Frame, area: ratatui::layout::Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(7), Constraint::Length(1)])
            .split(area);

        if self.add_stage > 0 {
            let mut lines: Vec<Line> = vec![Line::from(Span::styled(
                "── Add Entry ────────────────────────────────────",
                Style::default().add_modifier(Modifier::BOLD),
            ))];
            for (i, label) in ADD_LABELS.iter().enumerate() {
                let field_num = (i + 1) as u8;
                let value = if field_num < self.add_stage {
                    self.field_bufs.get(i).cloned().unwrap_or_default()
                } else if field_num == self.add_stage {
                    format!("{}_", self.input_buffer)
                } else {
                    String::new()
                };
                lines.push(Line::from(format!("{}: {}", label, value)));
            }
            lines.push(Line::from(Span::styled(
                "Enter=confirm  Esc=cancel",
                Style::default().fg(Color::DarkGray),
            )));
            f.render_widget(Paragraph::new(lines), chunks[0]);
        } else {
            let key_rows: Vec<Row> = vec![
                Row::new(vec!["↑ ↓", "Move selection", "n / p", "Next/prev range"]),
                Row::new(vec!["r/Enter", "Edit range", "Tab", "Switch view"]),
                Row::new(vec!["a", "Add entry", "Del/x", "Delete entry"]),
                Row::new(vec!["q/Ctrl+C", "Quit", "", ""]),
            ];
            let help = Table::new(
                key_rows,
                [
                    Constraint::Length(12),
                    Constraint::Length(24),
                    Constraint::Length(12),
                    Constraint::Length(24),
                ],
            )
            .column_spacing(1);
            f.render_widget(help, chunks[0]);
        }

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("Data  ", Style::default().add_modifier(Modifier::DIM)),
            Span::styled(
                self.data_dir.to_string_lossy().to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        f.render_widget(footer, chunks[1]);
    }
}

// ── Row construction helpers ──────────────────────────────────────────────────

fn section_header(title: &str) -> Row<'static> {
    Row::new(vec![
        Cell::from(title.to_string())
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Cell::from(""),
        Cell::from(""),
    ])
    .style(Style::default().bg(SECTION_BG))
}

fn spacer() -> Row<'static> {
    Row::new(vec![Cell::from(""), Cell::from(""), Cell::from("")])
}

fn data_row(label: impl Into<String>, value: Cell<'static>, extra: Cell<'static>) -> Row<'static> {
    Row::new(vec![Cell::from(format!("  {}", label.into())), value, extra])
}

fn plain(s: impl Into<String>) -> Cell<'static> {
    Cell::from(s.into())
}

fn colored(s: impl Into<String>, color: Color) -> Cell<'static> {
    Cell::from(s.into()).style(Style::default().fg(color))
}

fn billable_pct(s: &RangeSummary) -> String {
    if s.total_hours > 0.0 {
        format!("{:.0}%", 100.0 * s.billable_hours / s.total_hours)
    } else {
        String::new()
    }
}

// ── App event loop ────────────────────────────────────────────────────────────

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(StdDuration::from_millis(16))? {
            if let CEvent::Key(key) = event::read()? {
                if app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
    }
    Ok(())
}
