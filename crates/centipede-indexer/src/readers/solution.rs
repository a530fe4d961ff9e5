//! Visual Studio solution reader (`.sln` text and `.slnx` XML).

use super::{MemberProject, SolutionReader, to_host_separators};
use centipede_core::{IndexError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

const SOLUTION_HEADER: &str = "Microsoft Visual Studio Solution File";

/// Project type GUID of solution folders, which are not projects.
const SOLUTION_FOLDER_TYPE: &str = "2150E333-8FDC-42A3-9474-1A3956D46DE8";

#[derive(Debug, Default, Clone, Copy)]
pub struct VsSolutionReader;

impl SolutionReader for VsSolutionReader {
    fn read_member_projects(&self, solution_path: &Path) -> Result<Vec<MemberProject>> {
        let contents =
            fs::read_to_string(solution_path).map_err(|e| IndexError::access(solution_path, e))?;

        let is_xml = solution_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("slnx"));

        let members = if is_xml {
            parse_slnx(solution_path, &contents)?
        } else {
            parse_sln(solution_path, &contents)?
        };

        tracing::debug!(
            "{} references {} projects",
            solution_path.display(),
            members.len()
        );
        Ok(members)
    }
}

fn project_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"^Project\("\{([0-9A-Fa-f-]+)\}"\)\s*=\s*"([^"]*)"\s*,\s*"([^"]*)"\s*,\s*"\{[0-9A-Fa-f-]+\}"\s*$"#,
        )
        .expect("valid regex")
    })
}

fn parse_sln(path: &Path, contents: &str) -> Result<Vec<MemberProject>> {
    let contents = contents.trim_start_matches('\u{feff}');
    let has_header = contents
        .lines()
        .take(5)
        .any(|line| line.trim().starts_with(SOLUTION_HEADER));
    if !has_header {
        return Err(IndexError::parse(path, "missing solution file header"));
    }

    let mut members = Vec::new();
    for line in contents.lines() {
        let Some(caps) = project_line().captures(line.trim()) else {
            continue;
        };

        let project_type = &caps[1];
        let project_path = caps[3].trim();

        if project_type.eq_ignore_ascii_case(SOLUTION_FOLDER_TYPE) {
            continue;
        }
        if project_path.is_empty() || project_path.contains("://") {
            continue;
        }

        members.push(MemberProject::new(to_host_separators(project_path)));
    }
    Ok(members)
}

fn parse_slnx(path: &Path, contents: &str) -> Result<Vec<MemberProject>> {
    let doc = roxmltree::Document::parse(contents)
        .map_err(|e| IndexError::parse(path, e.to_string()))?;

    let solution = doc.root_element();
    if solution.tag_name().name() != "Solution" {
        return Err(IndexError::parse(
            path,
            format!(
                "root element is <{}>, expected <Solution>",
                solution.tag_name().name()
            ),
        ));
    }

    Ok(solution
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "Project")
        .filter_map(|n| n.attribute("Path"))
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| MemberProject::new(to_host_separators(p)))
        .collect())
}
