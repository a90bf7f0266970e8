use crate::data::{AppSettings, Project, ProjectData, Store, TimeLog, TimeLogData};
use anyhow::Result;
use chrono::NaiveDate;

pub fn run(store: &Store) -> Result<()> {
    std::fs::create_dir_all(store.dir())?;
    run_in_store(store)?;
    println!("Data files initialized successfully.");
    Ok(())
}

/// Writes all default data files into the store. Exposed for unit testing.
pub(crate) fn run_in_store(store: &Store) -> Result<()> {
    write_config(store)?;
    write_projects(store)?;
    write_logs(store)?;
    Ok(())
}

fn write_config(store: &Store) -> Result<()> {
    AppSettings::default().save(store)
}

fn write_projects(store: &Store) -> Result<()> {
    let mut data = ProjectData::default();
    data.add(Project::new("Internal", "", false));
    data.add(Project::new("Orion", "Stellar Corp", true));
    store.save(&data)
}

fn write_logs(store: &Store) -> Result<()> {
    let mut data = TimeLogData::default();
    data.add(TimeLog::new(d(2025, 1, 6), "Orion", "Kickoff", 4.0, true));
    data.add(TimeLog::new(d(2025, 1, 6), "Internal", "Planning", 2.0, false));
    store.save(&data)
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn store(tmp: &TempDir) -> Store {
        Store::new(tmp.path().to_path_buf())
    }

    #[test]
    fn test_run_in_store_creates_all_files() {
        let tmp = TempDir::new().unwrap();
        run_in_store(&store(&tmp)).unwrap();
        assert!(tmp.path().join("config.yaml").exists(), "config.yaml missing");
        assert!(
            tmp.path().join("projects.yaml").exists(),
            "projects.yaml missing"
        );
        assert!(
            tmp.path().join("timelogs.json").exists(),
            "timelogs.json missing"
        );
    }

    #[test]
    fn test_config_yaml_has_settings_key() {
        let tmp = TempDir::new().unwrap();
        write_config(&store(&tmp)).unwrap();
        let content = fs::read_to_string(tmp.path().join("config.yaml")).unwrap();
        assert!(content.contains("settings"), "config.yaml missing 'settings' key");
        assert!(
            content.contains("default_project"),
            "config.yaml missing 'default_project'"
        );
    }

    #[test]
    fn test_config_roundtrips_through_settings_loader() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        write_config(&s).unwrap();
        let settings = AppSettings::load(&s).unwrap();
        assert_eq!(settings.default_project, "Internal");
        assert_eq!(settings.day_hours, 8.0);
    }

    #[test]
    fn test_projects_file_has_seed_entries() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        write_projects(&s).unwrap();
        let data: ProjectData = s.load().unwrap();
        assert_eq!(data.projects.len(), 2);
        assert!(data.is_billable("Orion"));
        assert!(!data.is_billable("Internal"));
    }

    #[test]
    fn test_logs_file_has_seed_entries() {
        let tmp = TempDir::new().unwrap();
        let s = store(&tmp);
        write_logs(&s).unwrap();
        let data: TimeLogData = s.load().unwrap();
        assert_eq!(data.logs.len(), 2);
        assert_eq!(data.logs[0].date, "2025-01-06");
    }
}
