//! BigFunction definition files
//!
//! Each file in the bigfunctions folder describes one function:
//!
//! ```yaml
//! type: function_sql
//! author: Paul Marcombes
//! description: Return the sum of two integers
//! arguments:
//!   - name: a
//!     type: int64
//!   - name: b
//!     type: int64
//! output:
//!   name: total
//!   type: int64
//! examples:
//!   - description: simple case
//!     arguments: [1, 2]
//!     output: 3
//! code: a + b
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the function body is written
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// SQL expression body
    #[default]
    FunctionSql,
    /// JavaScript body
    FunctionJs,
}

/// A function argument or output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Argument {
    /// Argument name
    pub name: String,

    /// BigQuery type
    #[serde(rename = "type")]
    pub data_type: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// A usage example shown in the documentation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    /// What the example shows
    #[serde(default)]
    pub description: Option<String>,

    /// Argument values, written as SQL literals
    #[serde(default)]
    pub arguments: Vec<serde_yaml::Value>,

    /// Expected result
    #[serde(default)]
    pub output: Option<serde_yaml::Value>,
}

/// A bigfunction definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigFunction {
    /// Function name, taken from the file name
    #[serde(skip)]
    pub name: String,

    /// Body language
    #[serde(rename = "type", default)]
    pub kind: FunctionKind,

    /// Author shown in the docs
    #[serde(default)]
    pub author: Option<String>,

    /// Markdown description
    #[serde(default)]
    pub description: String,

    /// Ordered arguments
    #[serde(default)]
    pub arguments: Vec<Argument>,

    /// Return value
    #[serde(default)]
    pub output: Option<Argument>,

    /// Usage examples
    #[serde(default)]
    pub examples: Vec<Example>,

    /// Function body
    pub code: String,
}

impl BigFunction {
    /// Parse a definition from YAML, naming it `name`
    pub fn from_yaml(name: &str, contents: &str) -> Result<Self> {
        let mut function: BigFunction = serde_yaml::from_str(contents)?;
        function.name = name.to_string();
        Ok(function)
    }

    /// First line of the description, used in listings
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("").trim()
    }

    /// `name(arg type, ...)` as written in DDL
    pub fn signature(&self) -> String {
        let args = self
            .arguments
            .iter()
            .map(|a| format!("{} {}", a.name, a.data_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({})", self.name, args)
    }

    /// `CREATE OR REPLACE FUNCTION` statement deploying this function in
    /// `project.dataset`
    pub fn create_statement(&self, project: &str, dataset: &str) -> Result<String> {
        let mut ddl = format!(
            "CREATE OR REPLACE FUNCTION `{}.{}`.{}",
            project,
            dataset,
            self.signature()
        );

        match (&self.kind, &self.output) {
            (_, Some(output)) => {
                ddl.push_str(&format!("\nRETURNS {}", output.data_type));
            }
            (FunctionKind::FunctionJs, None) => {
                return Err(Error::InvalidDefinition {
                    name: self.name.clone(),
                    message: "javascript functions must declare an output type".to_string(),
                });
            }
            (FunctionKind::FunctionSql, None) => {}
        }

        if self.kind == FunctionKind::FunctionJs {
            ddl.push_str("\nLANGUAGE js");
        }

        if !self.description.trim().is_empty() {
            ddl.push_str(&format!(
                "\nOPTIONS(description={})",
                quote_string(self.description.trim())
            ));
        }

        match self.kind {
            FunctionKind::FunctionSql => {
                ddl.push_str(&format!("\nAS (\n{}\n)", self.code.trim_end()));
            }
            FunctionKind::FunctionJs => {
                if self.code.contains("\"\"\"") {
                    return Err(Error::InvalidDefinition {
                        name: self.name.clone(),
                        message: "javascript code cannot contain '\"\"\"'".to_string(),
                    });
                }
                ddl.push_str(&format!("\nAS r\"\"\"\n{}\n\"\"\"", self.code.trim_end()));
            }
        }

        Ok(ddl)
    }
}

/// Render `value` as a BigQuery string literal
fn quote_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

/// Render a YAML value as it would be written in a SQL call
pub fn sql_literal(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::Null => "null".to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
