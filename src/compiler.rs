//! # Project Compiler
//!
//! Main entry points for translating whole projects and handing the result
//! to an external source compiler.
//!
//! Classes are independent translation units and are translated in
//! parallel. One class failing never prevents its siblings from being
//! translated or reported.

use crate::codegen::ClassTranslator;
use crate::config::TranslatorConfig;
use crate::error::{ClassTranslationError, CompileError, GraphError};
use crate::graph::{unique_name, Class};
use crate::metadata::TypeCatalog;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of artifact the external compiler should produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    #[default]
    Library,
    Executable,
}

impl OutputKind {
    pub fn extension(self) -> &'static str {
        match self {
            OutputKind::Library => "dll",
            OutputKind::Executable => "exe",
        }
    }
}

/// A named set of classes plus the settings needed to build them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub default_namespace: String,
    /// Assembly references passed through to the external compiler.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub output_kind: OutputKind,
    #[serde(default)]
    classes: Vec<Class>,
}

impl Project {
    pub fn new(name: impl Into<String>, default_namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_namespace: default_namespace.into(),
            references: Vec::new(),
            output_kind: OutputKind::default(),
            classes: Vec::new(),
        }
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn class(&self, full_name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.full_name() == full_name)
    }

    pub fn class_mut(&mut self, full_name: &str) -> Option<&mut Class> {
        self.classes.iter_mut().find(|c| c.full_name() == full_name)
    }

    /// Add a class. Fully qualified class names are unique per project.
    pub fn add_class(&mut self, class: Class) -> Result<(), GraphError> {
        let full_name = class.full_name();
        if self.class(&full_name).is_some() {
            return Err(GraphError::DuplicateName {
                scope: format!("project '{}'", self.name),
                name: full_name,
            });
        }
        self.classes.push(class);
        Ok(())
    }

    /// Create an empty class with a fresh name in the default namespace.
    pub fn create_class(&mut self) -> &mut Class {
        let existing: Vec<String> = self
            .classes
            .iter()
            .filter(|c| c.namespace == self.default_namespace)
            .map(|c| c.name.clone())
            .collect();
        let name = unique_name("MyClass", &existing);

        self.classes.push(Class::new(name, self.default_namespace.clone()));
        let index = self.classes.len() - 1;
        &mut self.classes[index]
    }

    pub fn remove_class(&mut self, full_name: &str) -> Option<Class> {
        let index = self.classes.iter().position(|c| c.full_name() == full_name)?;
        Some(self.classes.remove(index))
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Source text of one successfully translated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatedClass {
    pub full_name: String,
    pub source: String,
}

/// Every error reported for one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFailure {
    pub full_name: String,
    pub errors: Vec<ClassTranslationError>,
}

impl fmt::Display for ClassFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} error(s)", self.full_name, self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

/// Per-class outcome of translating a project, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectTranslation {
    pub succeeded: Vec<TranslatedClass>,
    pub failed: Vec<ClassFailure>,
}

impl ProjectTranslation {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A message reported by the external compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            match self.line {
                Some(line) => write!(f, "{}({}): ", file, line)?,
                None => write!(f, "{}: ", file)?,
            }
        }
        let severity = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{} {}: {}", severity, self.code, self.message)
    }
}

/// Everything an external compiler needs to build a project.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub output_name: String,
    pub output_kind: OutputKind,
    pub references: &'a [String],
    pub sources: Vec<&'a str>,
}

#[derive(Debug, Clone, Default)]
pub struct CompilerOutput {
    /// Path of the produced artifact, if one was written.
    pub artifact: Option<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Collaborator that turns translated sources into a binary.
pub trait SourceCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> CompilerOutput;
}

#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifact: Option<String>,
    pub classes: Vec<TranslatedClass>,
    pub warnings: Vec<Diagnostic>,
}

/// Translate a single class to source text.
///
/// # Arguments
///
/// * `class` - The class to translate
/// * `catalog` - Type system used to re-validate every data connection
/// * `config` - Output formatting settings
///
/// # Returns
///
/// * `Ok(TranslatedClass)` - The class source, tagged with its full name
/// * `Err(ClassFailure)` - Every error found in the class
pub fn translate_class(
    class: &Class,
    catalog: &dyn TypeCatalog,
    config: &TranslatorConfig,
) -> Result<TranslatedClass, ClassFailure> {
    let full_name = class.full_name();
    match ClassTranslator::new(catalog, config).translate_class(class) {
        Ok(source) => Ok(TranslatedClass { full_name, source }),
        Err(errors) => Err(ClassFailure { full_name, errors }),
    }
}

/// Translate every class of a project.
///
/// Classes are translated in parallel; the result keeps declaration order.
pub fn translate_project(
    project: &Project,
    catalog: &dyn TypeCatalog,
    config: &TranslatorConfig,
) -> ProjectTranslation {
    tracing::info!("[TRANSLATOR] Starting project translation");
    tracing::info!(
        "[TRANSLATOR] Project: {} ({} classes)",
        project.name,
        project.classes.len()
    );

    let results: Vec<Result<TranslatedClass, ClassFailure>> = project
        .classes
        .par_iter()
        .map(|class| translate_class(class, catalog, config))
        .collect();

    let mut translation = ProjectTranslation::default();
    for result in results {
        match result {
            Ok(class) => {
                tracing::debug!("[TRANSLATOR] Translated {} ({} bytes)", class.full_name, class.source.len());
                translation.succeeded.push(class);
            }
            Err(failure) => {
                tracing::warn!("[TRANSLATOR] {}", failure);
                translation.failed.push(failure);
            }
        }
    }

    tracing::info!(
        "[TRANSLATOR] Translation finished: {} succeeded, {} failed",
        translation.succeeded.len(),
        translation.failed.len()
    );
    translation
}

/// Translate a project and build it with an external compiler.
///
/// # Returns
///
/// * `Ok(BuildOutput)` - Artifact path, sources and any warnings
/// * `Err(CompileError)` - Translation failures, or the compiler's error diagnostics
pub fn compile_project(
    project: &Project,
    catalog: &dyn TypeCatalog,
    config: &TranslatorConfig,
    compiler: &dyn SourceCompiler,
) -> Result<BuildOutput, CompileError> {
    // Phase 1: Translate classes
    tracing::info!("[TRANSLATOR] Phase 1: Translating classes...");
    let translation = translate_project(project, catalog, config);
    if !translation.is_success() {
        return Err(CompileError::Translation(translation.failed));
    }

    // Phase 2: Compile sources
    tracing::info!("[TRANSLATOR] Phase 2: Compiling {} source file(s)...", translation.succeeded.len());
    let request = CompileRequest {
        output_name: format!("{}.{}", project.name, project.output_kind.extension()),
        output_kind: project.output_kind,
        references: &project.references,
        sources: translation.succeeded.iter().map(|c| c.source.as_str()).collect(),
    };
    let output = compiler.compile(&request);

    let (errors, warnings): (Vec<Diagnostic>, Vec<Diagnostic>) = output
        .diagnostics
        .into_iter()
        .partition(|d| d.severity == Severity::Error);

    if !errors.is_empty() {
        tracing::warn!("[TRANSLATOR] Compilation failed with {} error(s)", errors.len());
        return Err(CompileError::Compilation { diagnostics: errors });
    }

    tracing::info!("[TRANSLATOR] Compilation successful!");
    Ok(BuildOutput {
        artifact: output.artifact,
        classes: translation.succeeded,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_class_picks_unique_names() {
        let mut project = Project::new("Game", "Game.Logic");
        project.create_class();
        project.create_class();

        let names: Vec<_> = project.classes().iter().map(|c| c.full_name()).collect();
        assert_eq!(names, ["Game.Logic.MyClass", "Game.Logic.MyClass2"]);
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let mut project = Project::new("Game", "Game");
        project.add_class(Class::new("Player", "Game")).unwrap();

        assert!(project.add_class(Class::new("Player", "Game")).is_err());
        assert!(project.add_class(Class::new("Player", "Other")).is_ok());
    }

    #[test]
    fn test_project_json_round_trip() {
        let mut project = Project::new("Game", "Game");
        project.output_kind = OutputKind::Executable;
        project.references.push("System.dll".to_string());
        project.create_class();

        let json = project.to_json_string().unwrap();
        assert_eq!(Project::from_json_str(&json).unwrap(), project);
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            severity: Severity::Error,
            code: "CS0103".to_string(),
            message: "The name 'x' does not exist".to_string(),
            file: Some("Player.cs".to_string()),
            line: Some(12),
        };
        assert_eq!(
            diagnostic.to_string(),
            "Player.cs(12): error CS0103: The name 'x' does not exist"
        );
    }
}
