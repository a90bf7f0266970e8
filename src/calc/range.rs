use chrono::{Datelike, Duration, NaiveDate};

/// A closed inclusive date interval. Committed ranges always satisfy
/// `from <= to`; a working copy may hold a singleton anchor mid-selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range with the endpoints ordered, whichever way they arrive.
    pub fn new(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            DateRange { from: a, to: b }
        } else {
            DateRange { from: b, to: a }
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        DateRange { from: day, to: day }
    }

    pub fn is_single(&self) -> bool {
        self.from == self.to
    }

    /// Inclusive day count: a singleton spans 1 day.
    pub fn span_days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && day <= self.to
    }
}

/// Determines how a selection click maps to a range and how Prev/Next
/// pages the committed range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
    Range,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Range => "Range",
        }
    }

    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Day => ViewMode::Week,
            ViewMode::Week => ViewMode::Month,
            ViewMode::Month => ViewMode::Range,
            ViewMode::Range => ViewMode::Day,
        }
    }
}

/// The ISO Monday–Sunday week containing `day`.
pub fn week_of(day: NaiveDate) -> DateRange {
    let monday = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    DateRange {
        from: monday,
        to: monday + Duration::days(6),
    }
}

/// The full calendar month containing `day`.
pub fn month_of(day: NaiveDate) -> DateRange {
    calendar_month(day.year(), day.month())
}

/// First through last day of month `m` in year `y`.
pub fn calendar_month(y: i32, m: u32) -> DateRange {
    let from = NaiveDate::from_ymd_opt(y, m, 1).unwrap_or_default();
    let to = NaiveDate::from_ymd_opt(y, m, days_in_month(y, m)).unwrap_or(from);
    DateRange { from, to }
}

pub fn start_of_month(day: NaiveDate) -> NaiveDate {
    month_of(day).from
}

/// Infers the view from a committed range at popover open: a singleton is a
/// Day, an exact calendar month is a Month, anything else keeps the view
/// that was last active.
pub fn infer_view(range: DateRange, current: ViewMode) -> ViewMode {
    if range.is_single() {
        ViewMode::Day
    } else if range == month_of(range.from) {
        ViewMode::Month
    } else {
        current
    }
}

/// Applies a day-cell selection to the working range.
///
/// In Range view this is a two-click protocol: clicking while the working
/// range is a singleton closes it against the anchor (ordered either way),
/// any other click restarts from a fresh singleton. Month view ignores day
/// cells; the month picker drives that view.
pub fn select_day(temp: DateRange, view: ViewMode, day: NaiveDate) -> DateRange {
    match view {
        ViewMode::Day => DateRange::single(day),
        ViewMode::Week => week_of(day),
        ViewMode::Month => temp,
        ViewMode::Range => {
            if temp.is_single() {
                DateRange::new(temp.from, day)
            } else {
                DateRange::single(day)
            }
        }
    }
}

/// Pages a committed range forward (`dir = 1`) or backward (`dir = -1`)
/// according to the active view. Range view shifts by the full span, so the
/// inclusive day count is preserved across the step.
pub fn step(range: DateRange, view: ViewMode, dir: i32) -> DateRange {
    match view {
        ViewMode::Day => {
            let delta = Duration::days(dir as i64);
            DateRange {
                from: range.from + delta,
                to: range.to + delta,
            }
        }
        ViewMode::Week => week_of(range.from + Duration::days(7 * dir as i64)),
        ViewMode::Month => month_of(add_months(start_of_month(range.from), dir)),
        ViewMode::Range => {
            let delta = Duration::days(range.span_days() * dir as i64);
            DateRange {
                from: range.from + delta,
                to: range.to + delta,
            }
        }
    }
}

/// Grid bounds for the month containing `day`: whole Monday-first weeks from
/// the week of the 1st through the week of the last day, so leading/trailing
/// days of adjacent months are always included.
pub fn grid_bounds(day: NaiveDate) -> DateRange {
    let month = month_of(day);
    DateRange {
        from: week_of(month.from).from,
        to: week_of(month.to).to,
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .signed_duration_since(NaiveDate::from_ymd_opt(year, month, 1).unwrap())
        .num_days() as u32
}

pub fn add_months(date: NaiveDate, months: i32) -> NaiveDate {
    let year = date.year();
    let month = date.month() as i32;
    let new_total = month - 1 + months;
    let new_month = ((new_total % 12 + 12) % 12 + 1) as u32;
    let year_delta = new_total.div_euclid(12);
    let new_year = year + year_delta;
    let max_day = days_in_month(new_year, new_month);
    let new_day = date.day().min(max_day);
    NaiveDate::from_ymd_opt(new_year, new_month, new_day).unwrap_or(date)
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
