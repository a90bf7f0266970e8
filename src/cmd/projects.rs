use crate::data::{ProjectData, Store};
use anyhow::Result;

pub fn run(store: &Store) -> Result<()> {
    let data: ProjectData = store.load()?;
    write_projects(&mut std::io::stdout(), &data)
}

fn write_projects<W: std::io::Write>(w: &mut W, data: &ProjectData) -> Result<()> {
    if data.projects.is_empty() {
        writeln!(w, "No projects configured.")?;
        return Ok(());
    }
    writeln!(w, "  {:<20} {:<20} Billable", "Project", "Client")?;
    for project in &data.projects {
        writeln!(
            w,
            "  {:<20} {:<20} {}",
            project.name,
            project.client,
            if project.billable { "yes" } else { "no" }
        )?;
    }
    Ok(())
}
