use crate::data::{AppSettings, ProjectData, Store, TimeLogData};
use crate::ui::logs_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;
use chrono::Local;

pub fn run(store: &Store) -> Result<()> {
    let settings = AppSettings::load(store)?;
    let project_data: ProjectData = store.load()?;
    let mut log_data: TimeLogData = store.load()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let today = Local::now().date_naive();
    let mut app = App::new(
        &mut log_data,
        &project_data,
        settings,
        today,
        store.dir().to_path_buf(),
    );

    let result = run_app(&mut terminal, &mut app);

    restore_terminal(&mut terminal)?;

    // Extract settings before dropping app (which holds a borrow on log_data)
    let final_settings = app.settings.clone();
    drop(app);

    store.save(&log_data)?;
    final_settings.save(store)?;

    result
}
