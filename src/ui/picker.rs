use crate::calc::range::{
    add_months, calendar_month, grid_bounds, infer_view, month_name, select_day, start_of_month,
    DateRange, ViewMode,
};
use chrono::{Datelike, Duration, NaiveDate};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BAND_BG: Color = Color::Rgb(40, 44, 52);

/// What a keypress inside the popover resolved to. The surrounding view
/// commits on Apply and does nothing on Cancel; the picker never touches
/// the committed range itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerAction {
    None,
    Apply(DateRange),
    Cancel,
}

/// Popover state: a working copy of the range, a month navigation cursor,
/// and the active view. The working copy is re-snapshotted from the
/// committed range on every open, so a cancelled edit can never leak into
/// the next session.
pub struct RangePicker {
    pub open: bool,
    pub view: ViewMode,
    pub temp: DateRange,
    today: NaiveDate,
    /// Day cell the keyboard cursor sits on.
    pub cursor: NaiveDate,
    /// First of the month whose grid is rendered (Range view also shows the
    /// following month).
    pub month_cursor: NaiveDate,
    /// Highlighted button in the month/year picker, 0-based.
    pub month_index: usize,
}

impl RangePicker {
    pub fn new(today: NaiveDate) -> Self {
        RangePicker {
            open: false,
            view: ViewMode::default(),
            temp: DateRange::single(today),
            today,
            cursor: today,
            month_cursor: start_of_month(today),
            month_index: today.month0() as usize,
        }
    }

    /// Opens the popover: snapshot committed → working copy and infer the
    /// view from the committed range's shape.
    pub fn open(&mut self, committed: DateRange) {
        self.open = true;
        self.view = infer_view(committed, self.view);
        self.sync(committed);
    }

    /// Re-aligns working copy and navigation cursor with a committed range.
    /// Used at open and after the top bar steps the committed range directly.
    pub fn sync(&mut self, committed: DateRange) {
        self.temp = committed;
        self.cursor = committed.from;
        self.month_cursor = start_of_month(committed.from);
        self.month_index = committed.from.month0() as usize;
    }

    /// Months whose grids are currently rendered.
    pub fn visible_months(&self) -> Vec<NaiveDate> {
        match self.view {
            ViewMode::Range => vec![self.month_cursor, add_months(self.month_cursor, 1)],
            _ => vec![self.month_cursor],
        }
    }

    /// Keeps the cursor inside the rendered grid(s), scrolling the month
    /// cursor when an arrow walks off the edge.
    fn ensure_cursor_visible(&mut self) {
        let months = self.visible_months();
        let first = grid_bounds(months[0]);
        let last = grid_bounds(*months.last().unwrap_or(&self.month_cursor));
        if self.cursor < first.from {
            self.month_cursor = add_months(self.month_cursor, -1);
        } else if self.cursor > last.to {
            self.month_cursor = add_months(self.month_cursor, 1);
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> PickerAction {
        match code {
            KeyCode::Esc => {
                self.open = false;
                return PickerAction::Cancel;
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.open = false;
                return PickerAction::Apply(self.temp);
            }
            KeyCode::Tab => {
                self.view = self.view.next();
                if self.view == ViewMode::Month {
                    self.month_index = self.month_cursor.month0() as usize;
                }
                return PickerAction::None;
            }
            // Quick jump back to today, without selecting it
            KeyCode::Char('t') => {
                self.cursor = self.today;
                self.month_cursor = start_of_month(self.today);
                self.month_index = self.today.month0() as usize;
                return PickerAction::None;
            }
            _ => {}
        }

        if self.view == ViewMode::Month {
            self.handle_month_picker_key(code);
        } else {
            self.handle_grid_key(code);
        }
        PickerAction::None
    }

    fn handle_month_picker_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                if self.month_index > 0 {
                    self.month_index -= 1;
                }
            }
            KeyCode::Right => {
                if self.month_index < 11 {
                    self.month_index += 1;
                }
            }
            KeyCode::Up => {
                if self.month_index >= 3 {
                    self.month_index -= 3;
                }
            }
            KeyCode::Down => {
                if self.month_index + 3 <= 11 {
                    self.month_index += 3;
                }
            }
            // Year chevrons: ±12 months on the navigation cursor
            KeyCode::Char('[') => {
                self.month_cursor = add_months(self.month_cursor, -12);
            }
            KeyCode::Char(']') => {
                self.month_cursor = add_months(self.month_cursor, 12);
            }
            KeyCode::Enter => {
                // One click fully determines the range in this view
                self.temp =
                    calendar_month(self.month_cursor.year(), self.month_index as u32 + 1);
                self.cursor = self.temp.from;
            }
            _ => {}
        }
    }

    fn handle_grid_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                self.cursor = self.cursor - Duration::days(1);
                self.ensure_cursor_visible();
            }
            KeyCode::Right => {
                self.cursor = self.cursor + Duration::days(1);
                self.ensure_cursor_visible();
            }
            KeyCode::Up => {
                self.cursor = self.cursor - Duration::days(7);
                self.ensure_cursor_visible();
            }
            KeyCode::Down => {
                self.cursor = self.cursor + Duration::days(7);
                self.ensure_cursor_visible();
            }
            KeyCode::Char('[') => {
                self.month_cursor = add_months(self.month_cursor, -1);
            }
            KeyCode::Char(']') => {
                self.month_cursor = add_months(self.month_cursor, 1);
            }
            KeyCode::Enter => {
                self.temp = select_day(self.temp, self.view, self.cursor);
            }
            _ => {}
        }
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(area, 50, 15);
        f.render_widget(Clear, popup);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Select Range ");
        let inner = block.inner(popup);
        f.render_widget(block, popup);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // view tabs
                Constraint::Length(1), // range line
                Constraint::Min(8),    // grid(s) or month picker
                Constraint::Length(1), // key hints
            ])
            .split(inner);

        f.render_widget(Paragraph::new(self.tabs_line()), chunks[0]);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                format!(
                    " {} – {}",
                    self.temp.from.format("%Y-%m-%d"),
                    self.temp.to.format("%Y-%m-%d")
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ))),
            chunks[1],
        );

        if self.view == ViewMode::Month {
            self.render_month_picker(f, chunks[2]);
        } else {
            self.render_grids(f, chunks[2]);
        }

        let hints = if self.view == ViewMode::Month {
            " ←→↑↓=month  [ ]=year  t=today  Enter=select  Tab=view  a=apply  Esc=cancel"
        } else {
            " ←→↑↓=day  [ ]=month  t=today  Enter=select  Tab=view  a=apply  Esc=cancel"
        };
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hints,
                Style::default().fg(Color::DarkGray),
            ))),
            chunks[3],
        );
    }

    fn tabs_line(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for view in [ViewMode::Day, ViewMode::Week, ViewMode::Month, ViewMode::Range] {
            let style = if view == self.view {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!(" {} ", view.label()), style));
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }

    fn render_grids(&self, f: &mut Frame, area: Rect) {
        const MONTH_WIDTH: u16 = 21;
        const GAP_WIDTH: u16 = 3;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(MONTH_WIDTH),
                Constraint::Length(GAP_WIDTH),
                Constraint::Length(MONTH_WIDTH),
                Constraint::Min(0),
            ])
            .split(area);

        let months = self.visible_months();
        let rects = [chunks[0], chunks[2]];
        for (i, month) in months.iter().enumerate() {
            let lines = self.month_grid_lines(*month);
            f.render_widget(
                Paragraph::new(lines).block(Block::default().borders(Borders::NONE)),
                rects[i],
            );
        }
    }

    /// Builds one month grid: title, Monday-first weekday header, then whole
    /// weeks including dimmed adjacent-month days. The selection band paints
    /// the gaps between adjacent in-band cells, but never past a row edge, so
    /// each week row reads as one continuous pill with capped ends.
    fn month_grid_lines(&self, month: NaiveDate) -> Vec<Line<'static>> {
        let title = format!("{} {}", month_name(month.month()), month.year());
        let mut lines: Vec<Line> = vec![
            Line::from(Span::styled(
                format!("{:^20}", title),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )),
            Line::from("Mo Tu We Th Fr Sa Su"),
        ];

        let bounds = grid_bounds(month);
        let mut day = bounds.from;
        while day <= bounds.to {
            let mut spans: Vec<Span> = Vec::new();
            for col in 0..7 {
                let in_month = day.month() == month.month() && day.year() == month.year();
                let style = day_cell_style(
                    self.is_endpoint(day),
                    self.is_interior(day),
                    day == self.cursor,
                    in_month,
                );
                spans.push(Span::styled(format!("{:2}", day.day()), style));
                if col < 6 {
                    let next = day + Duration::days(1);
                    let gap_style = if self.in_band(day) && self.in_band(next) {
                        Style::default().bg(BAND_BG)
                    } else {
                        Style::default()
                    };
                    spans.push(Span::styled(" ", gap_style));
                }
                day = day + Duration::days(1);
            }
            lines.push(Line::from(spans));
        }
        lines
    }

    fn render_month_picker(&self, f: &mut Frame, area: Rect) {
        let year_line = Line::from(Span::styled(
            format!("{:^20}", format!("‹  {}  ›", self.month_cursor.year())),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let mut lines = vec![year_line, Line::from("")];
        for row in 0..4 {
            let mut spans: Vec<Span> = vec![Span::raw(" ")];
            for col in 0..3 {
                let idx = row * 3 + col;
                let name = &month_name(idx as u32 + 1)[..3];
                let selected =
                    self.temp == calendar_month(self.month_cursor.year(), idx as u32 + 1);
                let style = if idx == self.month_index {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else if selected {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
                } else {
                    Style::default()
                };
                spans.push(Span::styled(format!(" {} ", name), style));
                spans.push(Span::raw("  "));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::NONE)),
            area,
        );
    }

    fn is_endpoint(&self, day: NaiveDate) -> bool {
        day == self.temp.from || day == self.temp.to
    }

    fn is_interior(&self, day: NaiveDate) -> bool {
        day > self.temp.from && day < self.temp.to
    }

    fn in_band(&self, day: NaiveDate) -> bool {
        self.temp.contains(day)
    }
}

/// Style for a single day cell. Endpoints render solid, strictly-interior
/// days get the tinted band, adjacent-month days are dimmed but stay live.
pub(crate) fn day_cell_style(
    is_endpoint: bool,
    is_interior: bool,
    is_cursor: bool,
    in_month: bool,
) -> Style {
    let mut style = if is_endpoint {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if is_interior {
        Style::default().bg(BAND_BG)
    } else {
        Style::default()
    };
    if !in_month && !is_endpoint {
        style = style.add_modifier(Modifier::DIM);
    }
    if is_cursor {
        style = style.add_modifier(if is_endpoint {
            Modifier::UNDERLINED
        } else {
            Modifier::REVERSED
        });
    }
    style
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn open_picker(committed: DateRange) -> RangePicker {
        let mut p = RangePicker::new(d(2025, 6, 15));
        p.open(committed);
        p
    }

    // ── open / view inference ─────────────────────────────────────────────────

    #[test]
    fn test_open_singleton_infers_day_view() {
        let p = open_picker(DateRange::single(d(2025, 3, 5)));
        assert_eq!(p.view, ViewMode::Day);
        assert_eq!(p.temp, DateRange::single(d(2025, 3, 5)));
        assert_eq!(p.cursor, d(2025, 3, 5));
    }

    #[test]
    fn test_open_exact_month_infers_month_view() {
        let p = open_picker(DateRange::new(d(2025, 4, 1), d(2025, 4, 30)));
        assert_eq!(p.view, ViewMode::Month);
        assert_eq!(p.month_index, 3);
    }

    #[test]
    fn test_open_other_range_keeps_last_view() {
        let mut p = RangePicker::new(d(2025, 6, 15));
        p.view = ViewMode::Range;
        p.open(DateRange::new(d(2025, 4, 3), d(2025, 4, 12)));
        assert_eq!(p.view, ViewMode::Range);
    }

    #[test]
    fn test_open_snapshots_committed() {
        let committed = DateRange::new(d(2025, 4, 3), d(2025, 4, 12));
        let p = open_picker(committed);
        assert_eq!(p.temp, committed);
        assert_eq!(p.month_cursor, d(2025, 4, 1));
    }

    // ── selection via keys ────────────────────────────────────────────────────

    #[test]
    fn test_day_view_enter_is_idempotent() {
        let mut p = open_picker(DateRange::single(d(2025, 1, 15)));
        p.handle_key(KeyCode::Enter);
        let first = p.temp;
        p.handle_key(KeyCode::Enter);
        assert_eq!(first, DateRange::single(d(2025, 1, 15)));
        assert_eq!(p.temp, first);
    }

    #[test]
    fn test_week_view_selects_whole_week() {
        let mut p = open_picker(DateRange::single(d(2025, 1, 15)));
        p.view = ViewMode::Week;
        p.handle_key(KeyCode::Enter);
        assert_eq!(p.temp.from, d(2025, 1, 13));
        assert_eq!(p.temp.to, d(2025, 1, 19));
    }

    #[test]
    fn test_range_two_clicks_reverse_order() {
        // Anchor Jan 20, move cursor back to Jan 10, close; range must be ordered
        let mut p = open_picker(DateRange::new(d(2025, 1, 2), d(2025, 1, 5)));
        p.view = ViewMode::Range;
        p.cursor = d(2025, 1, 20);
        p.handle_key(KeyCode::Enter); // restart: anchor singleton at Jan 20
        assert_eq!(p.temp, DateRange::single(d(2025, 1, 20)));
        p.cursor = d(2025, 1, 10);
        p.handle_key(KeyCode::Enter); // close against the anchor
        assert_eq!(p.temp, DateRange::new(d(2025, 1, 10), d(2025, 1, 20)));
    }

    #[test]
    fn test_range_invariant_over_click_sequence() {
        let mut p = open_picker(DateRange::single(d(2025, 3, 10)));
        p.view = ViewMode::Range;
        for day in [d(2025, 3, 25), d(2025, 3, 1), d(2025, 2, 14), d(2025, 4, 2)] {
            p.cursor = day;
            p.handle_key(KeyCode::Enter);
            assert!(p.temp.from <= p.temp.to);
        }
    }

    #[test]
    fn test_month_picker_enter_selects_exact_month() {
        let mut p = open_picker(DateRange::new(d(2025, 4, 1), d(2025, 4, 30)));
        assert_eq!(p.view, ViewMode::Month);
        p.handle_key(KeyCode::Right); // May
        p.handle_key(KeyCode::Enter);
        assert_eq!(p.temp.from, d(2025, 5, 1));
        assert_eq!(p.temp.to, d(2025, 5, 31));
    }

    #[test]
    fn test_month_picker_year_chevrons() {
        let mut p = open_picker(DateRange::new(d(2025, 4, 1), d(2025, 4, 30)));
        p.handle_key(KeyCode::Char(']'));
        assert_eq!(p.month_cursor.year(), 2026);
        p.handle_key(KeyCode::Char('['));
        p.handle_key(KeyCode::Char('['));
        assert_eq!(p.month_cursor.year(), 2024);
        p.handle_key(KeyCode::Enter);
        assert_eq!(p.temp.from.year(), 2024);
    }

    #[test]
    fn test_month_picker_index_clamps() {
        let mut p = open_picker(DateRange::new(d(2025, 1, 1), d(2025, 1, 31)));
        assert_eq!(p.month_index, 0);
        p.handle_key(KeyCode::Left);
        assert_eq!(p.month_index, 0);
        p.handle_key(KeyCode::Up);
        assert_eq!(p.month_index, 0);
        for _ in 0..15 {
            p.handle_key(KeyCode::Right);
        }
        assert_eq!(p.month_index, 11);
        p.handle_key(KeyCode::Down);
        assert_eq!(p.month_index, 11);
    }

    // ── commit / discard ──────────────────────────────────────────────────────

    #[test]
    fn test_apply_returns_working_copy_and_closes() {
        let mut p = open_picker(DateRange::single(d(2025, 1, 15)));
        p.cursor = d(2025, 1, 20);
        p.handle_key(KeyCode::Enter);
        let action = p.handle_key(KeyCode::Char('a'));
        assert_eq!(action, PickerAction::Apply(DateRange::single(d(2025, 1, 20))));
        assert!(!p.open);
    }

    #[test]
    fn test_cancel_closes_without_apply() {
        let mut p = open_picker(DateRange::single(d(2025, 1, 15)));
        p.cursor = d(2025, 1, 20);
        p.handle_key(KeyCode::Enter);
        let action = p.handle_key(KeyCode::Esc);
        assert_eq!(action, PickerAction::Cancel);
        assert!(!p.open);
    }

    #[test]
    fn test_reopen_discards_cancelled_edits() {
        let committed = DateRange::single(d(2025, 1, 15));
        let mut p = open_picker(committed);
        p.cursor = d(2025, 1, 20);
        p.handle_key(KeyCode::Enter);
        p.handle_key(KeyCode::Esc);
        // Reopen from the unchanged committed value: edits are gone
        p.open(committed);
        assert_eq!(p.temp, committed);
    }

    // ── navigation ────────────────────────────────────────────────────────────

    #[test]
    fn test_tab_cycles_view_without_touching_range() {
        let mut p = open_picker(DateRange::new(d(2025, 1, 3), d(2025, 1, 12)));
        let before = p.temp;
        p.view = ViewMode::Day;
        p.handle_key(KeyCode::Tab);
        assert_eq!(p.view, ViewMode::Week);
        assert_eq!(p.temp, before);
    }

    #[test]
    fn test_cursor_scrolls_month_backward() {
        let mut p = open_picker(DateRange::single(d(2025, 3, 1)));
        // 2025-03-01 is a Saturday; the March grid starts Mon Feb 24
        p.handle_key(KeyCode::Up); // cursor → Feb 22, off the grid
        assert_eq!(p.cursor, d(2025, 2, 22));
        assert_eq!(p.month_cursor, d(2025, 2, 1));
    }

    #[test]
    fn test_cursor_stays_in_trailing_week() {
        // March 2025's grid ends Sun Apr 6 (the week of Mon Mar 31), so moving
        // onto a trailing April day does not scroll the month.
        let mut p = open_picker(DateRange::single(d(2025, 3, 30)));
        p.handle_key(KeyCode::Down);
        assert_eq!(p.cursor, d(2025, 4, 6));
        assert_eq!(p.month_cursor, d(2025, 3, 1));
    }

    #[test]
    fn test_cursor_scrolls_month_forward() {
        // April 2025's grid runs Mar 31 – May 4; stepping past May 4 scrolls
        let mut p = open_picker(DateRange::single(d(2025, 4, 30)));
        p.handle_key(KeyCode::Down); // May 7
        assert_eq!(p.cursor, d(2025, 5, 7));
        assert_eq!(p.month_cursor, d(2025, 5, 1));
    }

    #[test]
    fn test_today_jump_moves_cursor_not_selection() {
        let mut p = RangePicker::new(d(2025, 6, 15));
        p.open(DateRange::new(d(2025, 1, 3), d(2025, 1, 12)));
        p.view = ViewMode::Day;
        p.handle_key(KeyCode::Char('t'));
        assert_eq!(p.cursor, d(2025, 6, 15));
        assert_eq!(p.month_cursor, d(2025, 6, 1));
        assert_eq!(p.temp, DateRange::new(d(2025, 1, 3), d(2025, 1, 12)));
    }

    #[test]
    fn test_bracket_keys_page_months() {
        let mut p = open_picker(DateRange::single(d(2025, 3, 10)));
        p.handle_key(KeyCode::Char(']'));
        assert_eq!(p.month_cursor, d(2025, 4, 1));
        p.handle_key(KeyCode::Char('['));
        p.handle_key(KeyCode::Char('['));
        assert_eq!(p.month_cursor, d(2025, 2, 1));
    }

    #[test]
    fn test_range_view_shows_two_months() {
        let mut p = open_picker(DateRange::new(d(2025, 1, 3), d(2025, 1, 12)));
        p.view = ViewMode::Range;
        assert_eq!(p.visible_months(), vec![d(2025, 1, 1), d(2025, 2, 1)]);
        p.view = ViewMode::Day;
        assert_eq!(p.visible_months(), vec![d(2025, 1, 1)]);
    }

    // ── day_cell_style ────────────────────────────────────────────────────────

    #[test]
    fn test_style_endpoint_solid() {
        let s = day_cell_style(true, false, false, true);
        assert_eq!(
            s,
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        );
    }

    #[test]
    fn test_style_interior_band() {
        let s = day_cell_style(false, true, false, true);
        assert_eq!(s, Style::default().bg(BAND_BG));
    }

    #[test]
    fn test_style_adjacent_month_dimmed() {
        let s = day_cell_style(false, false, false, false);
        assert_eq!(s, Style::default().add_modifier(Modifier::DIM));
    }

    #[test]
    fn test_style_endpoint_never_dimmed() {
        let s = day_cell_style(true, false, false, false);
        assert!(!s.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_style_cursor_reversed() {
        let s = day_cell_style(false, false, true, true);
        assert!(s.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_style_cursor_on_endpoint_underlines() {
        let s = day_cell_style(true, false, true, true);
        assert!(s.add_modifier.contains(Modifier::UNDERLINED));
        assert!(!s.add_modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_style_plain_day() {
        let s = day_cell_style(false, false, false, true);
        assert_eq!(s, Style::default());
    }
}
