use crate::data::persistence::Persistable;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Project {
    pub name: String,
    pub client: String,
    #[serde(default)]
    pub billable: bool,
}

impl Project {
    pub fn new(name: &str, client: &str, billable: bool) -> Self {
        Project {
            name: name.to_string(),
            client: client.to_string(),
            billable,
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct ProjectData {
    pub projects: Vec<Project>,
}

impl Persistable for ProjectData {
    fn filename() -> &'static str {
        "projects.yaml"
    }
    fn is_json() -> bool {
        false
    }
}

impl ProjectData {
    pub fn add(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn get(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    /// Whether entries for `name` default to billable. Unknown projects do.
    pub fn is_billable(&self, name: &str) -> bool {
        self.get(name).map(|p| p.billable).unwrap_or(true)
    }
}
