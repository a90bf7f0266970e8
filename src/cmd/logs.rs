use crate::calc::range::{month_of, DateRange};
use crate::calc::summary::summarize_range;
use crate::data::{Store, TimeLogData};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

pub fn run(store: &Store, from: Option<String>, to: Option<String>) -> Result<()> {
    let data: TimeLogData = store.load()?;
    let range = resolve_range(from, to, Local::now().date_naive())?;
    write_logs(&mut std::io::stdout(), &data, range)
}

/// Builds the reporting range from optional CLI bounds. With neither bound the
/// current calendar month is used; a single bound gives a one-day range.
pub(crate) fn resolve_range(
    from: Option<String>,
    to: Option<String>,
    today: NaiveDate,
) -> Result<DateRange> {
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
    };
    match (from, to) {
        (None, None) => Ok(month_of(today)),
        (Some(f), None) => {
            let d = parse(&f)?;
            Ok(DateRange::single(d))
        }
        (None, Some(t)) => {
            let d = parse(&t)?;
            Ok(DateRange::single(d))
        }
        (Some(f), Some(t)) => Ok(DateRange::new(parse(&f)?, parse(&t)?)),
    }
}

pub(crate) fn write_logs<W: std::io::Write>(
    w: &mut W,
    data: &TimeLogData,
    range: DateRange,
) -> Result<()> {
    writeln!(
        w,
        "Time logs {} – {} ({} days)",
        range.from.format("%Y-%m-%d"),
        range.to.format("%Y-%m-%d"),
        range.span_days()
    )?;
    writeln!(w)?;

    let logs = data.logs_between(range.from, range.to);
    if logs.is_empty() {
        writeln!(w, "  (no entries)")?;
    } else {
        writeln!(
            w,
            "  {:<12} {:<18} {:<24} {:>6}  {:<8} Notes",
            "Date", "Project", "Task", "Hours", "Billable"
        )?;
        for log in &logs {
            writeln!(
                w,
                "  {:<12} {:<18} {:<24} {:>6.2}  {:<8} {}",
                log.date,
                log.project,
                log.task,
                log.hours,
                if log.billable { "yes" } else { "no" },
                log.notes
            )?;
        }
    }

    let summary = summarize_range(data, range);
    writeln!(w)?;
    writeln!(w, "  Entries:        {}", summary.entries)?;
    writeln!(w, "  Days logged:    {}", summary.days_logged)?;
    writeln!(w, "  Total hours:    {:.2}", summary.total_hours)?;
    writeln!(w, "  Billable hours: {:.2}", summary.billable_hours)?;
    if !summary.by_project.is_empty() {
        writeln!(w)?;
        for p in &summary.by_project {
            writeln!(
                w,
                "  {:<18} {:>8.2} h  ({:.2} billable)",
                p.project, p.hours, p.billable_hours
            )?;
        }
    }
    Ok(())
}
