//! Markdown documentation
//!
//! Renders one page per definition plus an index page into the docs folder
//! served by mkdocs.

use std::path::{Path, PathBuf};

use minijinja::{Environment, context};

use crate::catalog::Catalog;
use crate::definition::{BigFunction, sql_literal};
use crate::error::Result;

/// Default folder generated pages are written to
pub const DEFAULT_OUTPUT: &str = "docs/bigfunctions";

const INDEX_FILE: &str = "README.md";

/// Lists the pages the last run generated, one file name per line
const MANIFEST_FILE: &str = ".bigfun-pages";

const FUNCTION_TEMPLATE: &str = r#"# {{ name }}

```
{{ signature }}
```

{{ description }}
{% if author %}
*Author: {{ author }}*
{% endif %}
{%- if arguments %}
## Arguments

| name | type | description |
|------|------|-------------|
{% for arg in arguments -%}
| `{{ arg.name }}` | `{{ arg.type }}` | {{ arg.description or "" }} |
{% endfor %}
{%- endif %}
{%- if output %}
## Output

`{{ output.name }}` (`{{ output.type }}`){% if output.description %}: {{ output.description }}{% endif %}
{% endif %}
{%- if examples %}
## Examples
{% for example in examples %}
{% if example.description %}{{ example.description }}
{% endif %}
```sql
select bigfunctions.{dataset}.{{ name }}({{ example.arguments | join(", ") }})
```
{% if example.output %}
```
{{ example.output }}
```
{% endif %}
{%- endfor %}
{%- endif %}
"#;

const INDEX_TEMPLATE: &str = r#"# BigFunctions

| function | description |
|----------|-------------|
{% for function in functions -%}
| [{{ function.name }}]({{ function.name }}.md) | {{ function.summary }} |
{% endfor %}"#;

/// Renders markdown pages from the definitions folder
#[derive(Debug, Clone)]
pub struct DocsGenerator {
    definitions: PathBuf,
    output: PathBuf,
}

impl DocsGenerator {
    /// Create a generator reading `definitions` and writing into `output`
    pub fn new(definitions: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            definitions: definitions.into(),
            output: output.into(),
        }
    }

    /// Folder pages are written to
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Regenerate every page and return the paths written.
    ///
    /// The catalog is re-read on each call so pages follow added and removed
    /// definitions. Pages an earlier run generated for definitions that are
    /// gone are deleted; other files in the output folder are never touched.
    pub fn generate(&self) -> Result<Vec<PathBuf>> {
        let catalog = Catalog::load(&self.definitions)?;
        let functions = catalog.definitions()?;

        let env = environment()?;
        std::fs::create_dir_all(&self.output)?;

        let mut written = Vec::with_capacity(functions.len() + 1);
        for function in &functions {
            let page = render_function(&env, function)?;
            let path = self.output.join(format!("{}.md", function.name));
            std::fs::write(&path, page)?;
            written.push(path);
        }

        let index = env.get_template("index.md")?.render(context! {
            functions => functions
                .iter()
                .map(|f| context! { name => f.name, summary => f.summary() })
                .collect::<Vec<_>>(),
        })?;
        let index_path = self.output.join(INDEX_FILE);
        std::fs::write(&index_path, index)?;
        written.push(index_path);

        self.remove_stale_pages(&written)?;
        self.write_manifest(&written)?;

        tracing::info!(
            "Generated documentation for {} bigfunction(s) in {}",
            functions.len(),
            self.output.display()
        );
        Ok(written)
    }

    fn remove_stale_pages(&self, keep: &[PathBuf]) -> Result<()> {
        let manifest = self.output.join(MANIFEST_FILE);
        let previous = match std::fs::read_to_string(&manifest) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for page in previous.lines().map(str::trim).filter(|l| is_page_name(l)) {
            let path = self.output.join(page);
            if !keep.contains(&path) && path.is_file() {
                tracing::debug!("Removing stale page {}", path.display());
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    fn write_manifest(&self, written: &[PathBuf]) -> Result<()> {
        let mut contents = String::new();
        for name in written.iter().filter_map(|p| p.file_name()?.to_str()) {
            contents.push_str(name);
            contents.push('\n');
        }
        std::fs::write(self.output.join(MANIFEST_FILE), contents)?;
        Ok(())
    }
}

/// A bare `*.md` file name, so a tampered manifest cannot reach outside the
/// output folder
fn is_page_name(name: &str) -> bool {
    let path = Path::new(name);
    name.ends_with(".md") && path.file_name().is_some_and(|f| f == path.as_os_str())
}

fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("function.md", FUNCTION_TEMPLATE)?;
    env.add_template("index.md", INDEX_TEMPLATE)?;
    Ok(env)
}

fn render_function(env: &Environment<'_>, function: &BigFunction) -> Result<String> {
    let examples: Vec<_> = function
        .examples
        .iter()
        .map(|e| {
            context! {
                description => e.description,
                arguments => e.arguments.iter().map(sql_literal).collect::<Vec<_>>(),
                output => e.output.as_ref().map(sql_literal),
            }
        })
        .collect();

    let page = env.get_template("function.md")?.render(context! {
        name => function.name,
        signature => function.signature(),
        description => function.description.trim(),
        author => function.author,
        arguments => function.arguments,
        output => function.output,
        examples => examples,
    })?;
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SUM: &str = r#"
author: Paul
description: Return the sum of two integers
arguments:
  - name: a
    type: int64
    description: first term
  - name: b
    type: int64
output:
  name: total
  type: int64
examples:
  - description: simple
    arguments: [1, 2]
    output: 3
code: a + b
"#;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("bigfunctions")).unwrap();
        std::fs::write(dir.path().join("bigfunctions/sum.yaml"), SUM).unwrap();
        std::fs::write(
            dir.path().join("bigfunctions/avg.yaml"),
            "description: Average\ncode: (a + b) / 2\n",
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_generate_writes_pages_and_index() {
        let dir = project();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));

        let written = generator.generate().unwrap();
        assert_eq!(written.len(), 3);

        let sum = std::fs::read_to_string(dir.path().join("docs/sum.md")).unwrap();
        assert!(sum.starts_with("# sum\n"));
        assert!(sum.contains("sum(a int64, b int64)"));
        assert!(sum.contains("| `a` | `int64` | first term |"));
        assert!(sum.contains("`total` (`int64`)"));
        assert!(sum.contains("select bigfunctions.{dataset}.sum(1, 2)"));
        assert!(sum.contains("*Author: Paul*"));

        let index = std::fs::read_to_string(dir.path().join("docs/README.md")).unwrap();
        assert!(index.contains("| [avg](avg.md) | Average |"));
        assert!(index.contains("| [sum](sum.md) | Return the sum of two integers |"));
        assert!(index.find("[avg]").unwrap() < index.find("[sum]").unwrap());
    }

    #[test]
    fn test_generate_removes_stale_pages() {
        let dir = project();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));
        generator.generate().unwrap();
        assert!(dir.path().join("docs/avg.md").exists());

        std::fs::remove_file(dir.path().join("bigfunctions/avg.yaml")).unwrap();
        std::fs::write(dir.path().join("docs/notes.txt"), "keep me").unwrap();
        generator.generate().unwrap();

        assert!(!dir.path().join("docs/avg.md").exists());
        assert!(dir.path().join("docs/sum.md").exists());
        assert!(dir.path().join("docs/notes.txt").exists());
    }

    #[test]
    fn test_generate_keeps_hand_written_pages() {
        let dir = project();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.md"), "# Welcome\n").unwrap();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));

        generator.generate().unwrap();
        generator.generate().unwrap();

        let index = std::fs::read_to_string(dir.path().join("docs/index.md")).unwrap();
        assert_eq!(index, "# Welcome\n");
        assert!(dir.path().join("docs/sum.md").exists());
    }

    #[test]
    fn test_manifest_lists_generated_pages() {
        let dir = project();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));
        generator.generate().unwrap();

        let manifest = std::fs::read_to_string(dir.path().join("docs").join(MANIFEST_FILE)).unwrap();
        assert_eq!(manifest, "avg.md\nsum.md\nREADME.md\n");
    }

    #[test]
    fn test_manifest_entries_outside_output_are_ignored() {
        let dir = project();
        std::fs::create_dir_all(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("outside.md"), "keep").unwrap();
        std::fs::write(
            dir.path().join("docs").join(MANIFEST_FILE),
            "../outside.md\nold.md\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("docs/old.md"), "stale").unwrap();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));

        generator.generate().unwrap();

        assert!(dir.path().join("outside.md").exists());
        assert!(!dir.path().join("docs/old.md").exists());
    }

    #[test]
    fn test_generate_fails_on_invalid_definition() {
        let dir = project();
        std::fs::write(dir.path().join("bigfunctions/bad.yaml"), "arguments: 3\n").unwrap();
        let generator = DocsGenerator::new(dir.path().join("bigfunctions"), dir.path().join("docs"));

        assert!(generator.generate().is_err());
    }
}
