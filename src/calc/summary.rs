use crate::calc::range::DateRange;
use crate::data::TimeLogData;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectHours {
    pub project: String,
    pub hours: f64,
    pub billable_hours: f64,
}

/// Totals over the entries inside a committed range. Everything here is a
/// display-side sum of already-recorded numbers.
#[derive(Debug, Clone, Default)]
pub struct RangeSummary {
    pub entries: usize,
    pub total_hours: f64,
    pub billable_hours: f64,
    /// Distinct dates that have at least one entry.
    pub days_logged: usize,
    /// Per-project totals, largest first.
    pub by_project: Vec<ProjectHours>,
}

pub fn summarize_range(data: &TimeLogData, range: DateRange) -> RangeSummary {
    let logs = data.logs_between(range.from, range.to);

    let mut total_hours = 0.0;
    let mut billable_hours = 0.0;
    let mut days: BTreeMap<&str, ()> = BTreeMap::new();
    let mut projects: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for log in &logs {
        total_hours += log.hours;
        if log.billable {
            billable_hours += log.hours;
        }
        days.insert(log.date.as_str(), ());
        let entry = projects.entry(log.project.as_str()).or_insert((0.0, 0.0));
        entry.0 += log.hours;
        if log.billable {
            entry.1 += log.hours;
        }
    }

    let mut by_project: Vec<ProjectHours> = projects
        .into_iter()
        .map(|(project, (hours, billable_hours))| ProjectHours {
            project: project.to_string(),
            hours,
            billable_hours,
        })
        .collect();
    by_project.sort_by(|a, b| b.hours.partial_cmp(&a.hours).unwrap_or(std::cmp::Ordering::Equal));

    RangeSummary {
        entries: logs.len(),
        total_hours,
        billable_hours,
        days_logged: days.len(),
        by_project,
    }
}
