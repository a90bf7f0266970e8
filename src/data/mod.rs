pub mod app_settings;
pub mod persistence;
pub mod project;
pub mod time_log;

pub use app_settings::AppSettings;
pub use persistence::{Persistable, Store};
pub use project::{Project, ProjectData};
pub use time_log::{TimeLog, TimeLogData};
