use crate::calc::range::DateRange;
use crate::cmd::logs::resolve_range;
use crate::data::{Store, TimeLogData};
use anyhow::{Context, Result};
use chrono::Local;
use std::path::Path;

pub fn run(
    store: &Store,
    from: Option<String>,
    to: Option<String>,
    output: Option<String>,
) -> Result<()> {
    let data: TimeLogData = store.load()?;
    let range = resolve_range(from, to, Local::now().date_naive())?;
    match output {
        Some(path) => {
            let path = Path::new(&path);
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(&mut file, &data, range)?;
            println!("Exported to {}", path.display());
        }
        None => write_csv(&mut std::io::stdout(), &data, range)?,
    }
    Ok(())
}

pub(crate) fn write_csv<W: std::io::Write>(
    w: &mut W,
    data: &TimeLogData,
    range: DateRange,
) -> Result<()> {
    writeln!(w, "date,project,task,hours,billable,notes")?;
    for log in data.logs_between(range.from, range.to) {
        writeln!(
            w,
            "{},{},{},{},{},{}",
            log.date,
            csv_field(&log.project),
            csv_field(&log.task),
            log.hours,
            log.billable,
            csv_field(&log.notes)
        )?;
    }
    Ok(())
}

/// Quotes a field when it contains a comma, quote, or newline.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TimeLog;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let mut data = TimeLogData::default();
        data.add(TimeLog::new(d(2025, 3, 4), "Orion", "Dev", 6.0, true));
        data.add(TimeLog::new(d(2025, 4, 1), "Orion", "Dev", 8.0, true));

        let mut buf = Vec::new();
        write_csv(&mut buf, &data, DateRange::new(d(2025, 3, 1), d(2025, 3, 31))).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "date,project,task,hours,billable,notes");
        assert_eq!(lines[1], "2025-03-04,Orion,Dev,6,true,");
        // April entry is outside the range
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_csv_field_quotes_commas_and_quotes() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_write_csv_quotes_notes() {
        let mut data = TimeLogData::default();
        let mut log = TimeLog::new(d(2025, 3, 4), "Orion", "Dev", 6.0, true);
        log.notes = "review, merge".to_string();
        data.add(log);

        let mut buf = Vec::new();
        write_csv(&mut buf, &data, DateRange::single(d(2025, 3, 4))).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("\"review, merge\""));
    }
}
