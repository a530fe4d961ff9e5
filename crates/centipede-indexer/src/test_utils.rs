//! Test utilities for Centipede

use std::fs;
use tempfile::TempDir;

/// Create a repository with a specific file structure
pub fn create_repo_with_structure(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// A classic `.sln` referencing the given project paths.
pub fn sln_file(projects: &[&str]) -> String {
    let mut text = String::from(
        "\nMicrosoft Visual Studio Solution File, Format Version 12.00\n# Visual Studio Version 17\n",
    );
    for (i, project) in projects.iter().enumerate() {
        let name = project
            .rsplit(|c: char| c == '\\' || c == '/')
            .next()
            .and_then(|file| file.split('.').next())
            .unwrap_or("Project");
        text.push_str(&format!(
            "Project(\"{{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}}\") = \"{}\", \"{}\", \"{{00000000-0000-0000-0000-{:012}}}\"\nEndProject\n",
            name, project, i
        ));
    }
    text.push_str("Global\nEndGlobal\n");
    text
}

/// An old-style `.csproj` with explicit `Compile` items.
pub fn csproj_file(compiled: &[&str]) -> String {
    let items: String = compiled
        .iter()
        .map(|file| format!("    <Compile Include=\"{}\" />\n", file))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
         <Project ToolsVersion=\"15.0\" xmlns=\"http://schemas.microsoft.com/developer/msbuild/2003\">\n\
         \x20 <ItemGroup>\n{}  </ItemGroup>\n</Project>\n",
        items
    )
}

/// The two-project solution used throughout the tests:
/// `App.sln` → `Lib.csproj` (`Utils.cs`) and `App.csproj` (`Main.cs`).
pub fn create_app_repo() -> TempDir {
    create_repo_with_structure(&[
        (
            "App.sln",
            sln_file(&["Lib\\Lib.csproj", "App\\App.csproj"]).as_str(),
        ),
        ("Lib/Lib.csproj", csproj_file(&["Utils.cs"]).as_str()),
        ("Lib/Utils.cs", "class Utils {}"),
        ("App/App.csproj", csproj_file(&["Main.cs"]).as_str()),
        ("App/Main.cs", "class Program {}"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_app_repo() {
        let temp_dir = create_app_repo();
        let root = temp_dir.path();

        assert!(root.join("App.sln").exists());
        assert!(root.join("Lib/Lib.csproj").exists());
        assert!(root.join("App/Main.cs").exists());
    }

    #[test]
    fn test_csproj_file_is_valid_xml() {
        let text = csproj_file(&["A.cs", "B.cs"]);
        let doc = roxmltree::Document::parse(&text).unwrap();
        assert_eq!(doc.root_element().tag_name().name(), "Project");
    }
}
