//! MSBuild project reader.
//!
//! This is not an MSBuild evaluator. It understands what matters for
//! compile membership: `Compile` items with `Include`/`Remove`, wildcard
//! item specs, and the implicit `**/*.cs` glob of SDK-style projects.
//! Item specs that need property or item evaluation are skipped.

use super::{ProjectReader, to_host_separators};
use centipede_core::{IndexError, Result, normalize_path};
use globset::{GlobBuilder, GlobMatcher};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `Compile` items out of `*.csproj`-style XML.
#[derive(Debug, Default, Clone, Copy)]
pub struct MsBuildProjectReader;

impl ProjectReader for MsBuildProjectReader {
    fn read_compiled_files(&self, project_path: &Path) -> Result<Vec<PathBuf>> {
        let contents =
            fs::read_to_string(project_path).map_err(|e| IndexError::access(project_path, e))?;
        let doc = roxmltree::Document::parse(&contents)
            .map_err(|e| IndexError::parse(project_path, e.to_string()))?;

        let project = doc.root_element();
        if project.tag_name().name() != "Project" {
            return Err(IndexError::parse(
                project_path,
                format!(
                    "root element is <{}>, expected <Project>",
                    project.tag_name().name()
                ),
            ));
        }

        let project_file = normalize_path(project_path);
        let project_dir = project_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut includes = Vec::new();
        let mut removes = Vec::new();

        if let Some(ext) = default_compile_extension(&project, &project_file) {
            let pattern = ItemPattern::wildcard(&project_dir, &format!("**/*.{}", ext), true)
                .map_err(|e| IndexError::parse(project_path, e.to_string()))?;
            includes.push(pattern);
        }

        for item in project
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == "Compile")
        {
            for (attribute, target) in [("Include", &mut includes), ("Remove", &mut removes)] {
                let Some(spec) = item.attribute(attribute) else {
                    continue;
                };
                for raw in split_item_spec(spec) {
                    let pattern = ItemPattern::parse(&project_dir, raw)
                        .map_err(|e| IndexError::parse(project_path, e.to_string()))?;
                    target.push(pattern);
                }
            }
        }

        // Keyed by lowercase path: one entry per file, in a stable order.
        let mut compiled: BTreeMap<String, PathBuf> = BTreeMap::new();
        for pattern in &includes {
            for path in pattern.expand() {
                if removes.iter().any(|r| r.matches(&path)) {
                    continue;
                }
                compiled
                    .entry(path.to_string_lossy().to_lowercase())
                    .or_insert(path);
            }
        }

        tracing::debug!(
            "{} compiles {} files",
            project_path.display(),
            compiled.len()
        );
        Ok(compiled.into_values().collect())
    }
}

/// Splits a `;`-separated item spec, dropping entries that need evaluation.
fn split_item_spec(spec: &str) -> impl Iterator<Item = &str> {
    spec.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| !(s.contains("$(") || s.contains("@(") || s.contains("%(")))
}

/// Extension compiled implicitly by an SDK-style project, if any.
fn default_compile_extension(
    project: &roxmltree::Node<'_, '_>,
    project_file: &Path,
) -> Option<&'static str> {
    let is_sdk = project.attribute("Sdk").is_some()
        || project.children().any(|n| n.is_element() && n.tag_name().name() == "Sdk")
        || project.children().any(|n| {
            n.is_element() && n.tag_name().name() == "Import" && n.attribute("Sdk").is_some()
        });
    if !is_sdk {
        return None;
    }

    let disabled = project.descendants().any(|n| {
        n.is_element()
            && matches!(
                n.tag_name().name(),
                "EnableDefaultCompileItems" | "EnableDefaultItems"
            )
            && n.text().is_some_and(|t| t.trim().eq_ignore_ascii_case("false"))
    });
    if disabled {
        return None;
    }

    match project_file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("csproj") => Some("cs"),
        Some("vbproj") => Some("vb"),
        _ => None,
    }
}

fn has_wildcard(raw: &str) -> bool {
    raw.contains(|c: char| c == '*' || c == '?')
}

/// One entry of an item spec, resolved against the project directory.
enum ItemPattern {
    Literal(PathBuf),
    Wildcard {
        base: PathBuf,
        matcher: GlobMatcher,
        /// Skip `bin/`, `obj/` and dot-directories, as SDK default globs do.
        skip_build_output: bool,
    },
}

impl ItemPattern {
    fn parse(project_dir: &Path, raw: &str) -> std::result::Result<Self, globset::Error> {
        if has_wildcard(raw) {
            Self::wildcard(project_dir, raw, false)
        } else {
            let path = normalize_path(&project_dir.join(to_host_separators(raw)));
            Ok(Self::Literal(path))
        }
    }

    /// Splits `raw` into the literal directory prefix and the glob that
    /// follows it, so `..\Shared\**\*.cs` walks `../Shared` only.
    fn wildcard(
        project_dir: &Path,
        raw: &str,
        skip_build_output: bool,
    ) -> std::result::Result<Self, globset::Error> {
        let unified = raw.replace('\\', "/");
        let segments: Vec<&str> = unified.split('/').collect();
        let split_at = segments
            .iter()
            .position(|s| has_wildcard(s))
            .unwrap_or(segments.len());

        // A rooted prefix replaces the project directory, as `Path::join` does.
        let prefix = PathBuf::from(to_host_separators(&segments[..split_at].join("/")));
        let base = if prefix.is_absolute() {
            prefix
        } else {
            project_dir.join(prefix)
        };
        let glob = segments[split_at..].join("/");

        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .case_insensitive(true)
            .build()?
            .compile_matcher();

        Ok(Self::Wildcard {
            base: normalize_path(&base),
            matcher,
            skip_build_output,
        })
    }

    fn matches(&self, path: &Path) -> bool {
        match self {
            Self::Literal(literal) => {
                literal.to_string_lossy().to_lowercase() == path.to_string_lossy().to_lowercase()
            }
            Self::Wildcard { base, matcher, .. } => match path.strip_prefix(base) {
                Ok(relative) => matcher.is_match(relative_glob_path(relative)),
                Err(_) => false,
            },
        }
    }

    fn expand(&self) -> Vec<PathBuf> {
        match self {
            Self::Literal(path) => vec![path.clone()],
            Self::Wildcard {
                base,
                matcher,
                skip_build_output,
            } => {
                if !base.is_dir() {
                    return Vec::new();
                }

                let skip = *skip_build_output;
                let walker = ignore::WalkBuilder::new(base)
                    .standard_filters(false)
                    .follow_links(false)
                    .filter_entry(move |entry| {
                        !skip || entry.depth() == 0 || !is_build_output_dir(entry)
                    })
                    .build();

                let mut matched = Vec::new();
                for entry in walker {
                    let entry = match entry {
                        Ok(entry) => entry,
                        Err(e) => {
                            tracing::debug!("Skipping unreadable entry under {}: {}", base.display(), e);
                            continue;
                        }
                    };
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }
                    let path = entry.path();
                    if let Ok(relative) = path.strip_prefix(base) {
                        if matcher.is_match(relative_glob_path(relative)) {
                            matched.push(path.to_path_buf());
                        }
                    }
                }
                matched
            }
        }
    }
}

fn is_build_output_dir(entry: &ignore::DirEntry) -> bool {
    if !entry.file_type().is_some_and(|t| t.is_dir()) {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || (entry.depth() == 1
            && (name.eq_ignore_ascii_case("bin") || name.eq_ignore_ascii_case("obj")))
}

/// Relative path with `/` separators, the form globs are written in.
fn relative_glob_path(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
