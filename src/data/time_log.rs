use crate::data::persistence::Persistable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TimeLog {
    /// yyyy-mm-dd, stored as the sort and lookup key.
    pub date: String,
    pub project: String,
    pub task: String,
    pub hours: f64,
    #[serde(default = "default_true")]
    pub billable: bool,
    #[serde(default)]
    pub notes: String,
}

impl TimeLog {
    pub fn new(date: NaiveDate, project: &str, task: &str, hours: f64, billable: bool) -> Self {
        TimeLog {
            date: date.format("%Y-%m-%d").to_string(),
            project: project.to_string(),
            task: task.to_string(),
            hours,
            billable,
            notes: String::new(),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct TimeLogData {
    pub logs: Vec<TimeLog>,
}

impl Persistable for TimeLogData {
    fn filename() -> &'static str {
        "timelogs.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl TimeLogData {
    pub fn add(&mut self, log: TimeLog) {
        self.logs.push(log);
        self.logs.sort_by(|a, b| a.date.cmp(&b.date));
    }

    pub fn remove_at(&mut self, index: usize) {
        if index < self.logs.len() {
            self.logs.remove(index);
        }
    }

    /// Entries with a valid date inside [from, to] inclusive, in date order.
    /// Entries with an unparseable date are skipped.
    pub fn logs_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&TimeLog> {
        self.logs
            .iter()
            .filter(|l| {
                l.parsed_date()
                    .map(|d| d >= from && d <= to)
                    .unwrap_or(false)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_time_log_new_sets_fields() {
        let log = TimeLog::new(d(2025, 3, 15), "Orion", "API review", 2.5, true);
        assert_eq!(log.date, "2025-03-15");
        assert_eq!(log.project, "Orion");
        assert_eq!(log.task, "API review");
        assert_eq!(log.hours, 2.5);
        assert!(log.billable);
        assert!(log.notes.is_empty());
    }

    #[test]
    fn test_parsed_date_roundtrips() {
        let log = TimeLog::new(d(2025, 3, 15), "Orion", "t", 1.0, true);
        assert_eq!(log.parsed_date(), Some(d(2025, 3, 15)));
    }

    #[test]
    fn test_parsed_date_invalid_is_none() {
        let mut log = TimeLog::new(d(2025, 3, 15), "Orion", "t", 1.0, true);
        log.date = "not-a-date".to_string();
        assert!(log.parsed_date().is_none());
    }

    #[test]
    fn test_add_sorts_by_date() {
        let mut data = TimeLogData::default();
        data.add(TimeLog::new(d(2025, 3, 15), "B", "t", 1.0, true));
        data.add(TimeLog::new(d(2025, 3, 10), "A", "t", 2.0, true));
        assert_eq!(data.logs[0].date, "2025-03-10");
        assert_eq!(data.logs[1].date, "2025-03-15");
    }

    #[test]
    fn test_remove_at_deletes_entry() {
        let mut data = TimeLogData::default();
        data.add(TimeLog::new(d(2025, 3, 10), "A", "t", 2.0, true));
        data.add(TimeLog::new(d(2025, 3, 15), "B", "t", 1.0, true));
        data.remove_at(0);
        assert_eq!(data.logs.len(), 1);
        assert_eq!(data.logs[0].project, "B");
    }

    #[test]
    fn test_remove_at_out_of_bounds_is_noop() {
        let mut data = TimeLogData::default();
        data.add(TimeLog::new(d(2025, 3, 10), "A", "t", 2.0, true));
        data.remove_at(5);
        assert_eq!(data.logs.len(), 1);
    }

    #[test]
    fn test_logs_between_inclusive_boundaries() {
        let mut data = TimeLogData::default();
        data.add(TimeLog::new(d(2025, 1, 1), "A", "t", 1.0, true));
        data.add(TimeLog::new(d(2025, 1, 15), "B", "t", 1.0, true));
        data.add(TimeLog::new(d(2025, 1, 31), "C", "t", 1.0, true));
        data.add(TimeLog::new(d(2025, 2, 1), "D", "t", 1.0, true));
        let hits = data.logs_between(d(2025, 1, 1), d(2025, 1, 31));
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].project, "A");
        assert_eq!(hits[2].project, "C");
    }

    #[test]
    fn test_logs_between_skips_invalid_dates() {
        let mut data = TimeLogData::default();
        let mut bad = TimeLog::new(d(2025, 1, 10), "A", "t", 1.0, true);
        bad.date = "garbage".to_string();
        data.logs.push(bad);
        let hits = data.logs_between(d(2025, 1, 1), d(2025, 1, 31));
        assert!(hits.is_empty());
    }

    #[test]
    fn test_billable_defaults_true_when_absent() {
        let json = r#"{"date":"2025-01-10","project":"A","task":"t","hours":1.0}"#;
        let log: TimeLog = serde_json::from_str(json).unwrap();
        assert!(log.billable);
        assert!(log.notes.is_empty());
    }
}
