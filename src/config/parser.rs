use super::CrewConfig;
use crate::errors::Result;
use std::fs;
use std::path::Path;

use tracing::info;

const OPENRTB_CREW: &str = include_str!("../../crews/openrtb.yaml");

/// Loads and parses a crew configuration from a YAML file
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read
/// * The YAML content cannot be parsed into a CrewConfig
pub fn load_crew_config(file_path: &Path) -> Result<CrewConfig> {
    let yaml_str = fs::read_to_string(file_path)?;
    let crew = parse_crew_config(&yaml_str)?;
    info!(
        "Loaded crew configuration '{}' from {}",
        crew.name,
        file_path.display()
    );
    Ok(crew)
}

pub fn parse_crew_config(yaml: &str) -> Result<CrewConfig> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// The bundled OpenRTB bid request crew
pub fn builtin_crew() -> Result<CrewConfig> {
    parse_crew_config(OPENRTB_CREW)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::io::Write;

    #[test]
    fn builtin_crew_has_three_chained_tasks() {
        let crew = builtin_crew().unwrap();

        assert!(crew.memory);
        assert_eq!(crew.agents.len(), 3);
        let ids: Vec<_> = crew.tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["request_intake", "dependency_map", "requirement_adherence"]);
        assert_eq!(crew.tasks[1].dependencies, vec!["request_intake"]);
        assert_eq!(crew.tasks[2].dependencies, vec!["dependency_map"]);
        assert!(crew.agents[0].goal.contains("{request}"));
        assert!(crew.agents[0].allow_delegation);
        assert_eq!(crew.agents[0].tools, vec!["spec_search", "web_search"]);
    }

    #[test]
    fn loads_crew_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name: tiny
agents:
  - role: writer
    goal: write
    backstory: writes things
tasks:
  - id: only
    description: write it
    expected_output: text
    agent: writer
    timeout: 2m
"#
        )
        .unwrap();

        let crew = load_crew_config(file.path()).unwrap();

        assert_eq!(crew.name, "tiny");
        assert!(!crew.memory);
        assert!(crew.agents[0].tools.is_empty());
        assert_eq!(crew.tasks[0].timeout.as_deref(), Some("2m"));
        assert_eq!(crew.tasks[0].priority, 0);
    }

    #[test]
    fn invalid_yaml_and_missing_files_are_errors() {
        assert!(matches!(parse_crew_config("name: ["), Err(Error::Yaml(_))));
        assert!(matches!(
            load_crew_config(Path::new("/nonexistent/crew.yaml")),
            Err(Error::Io(_))
        ));
    }
}
