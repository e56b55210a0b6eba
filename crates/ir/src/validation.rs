//! Consistency checks over a schema graph
//!
//! The mutators keep the graph consistent as long as they are the only
//! writers. Snapshots loaded from disk or produced by external changes are
//! not bound by that, so hosts can run [`validate_graph`] on them.

use crate::graph::SchemaGraph;
use crate::relation::invert_relation_kind;
use crate::schema::SchemaEntity;
use ctb_core::{BuilderError, BuilderResult, ForTarget, StatusTracked};
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

static CONTENT_TYPE_UID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(api|plugin|admin)::[a-z0-9][a-z0-9-]*\.[a-z0-9][a-z0-9-]*$")
        .expect("content type uid pattern is valid")
});

static COMPONENT_UID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]*\.[a-z0-9][a-z0-9-]*$").expect("component uid pattern is valid")
});

// ============================================================================
// ValidationResult
// ============================================================================

/// Result of a validation pass
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// List of errors (empty if valid)
    pub errors: Vec<ValidationError>,

    /// List of warnings (non-fatal issues)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning to the result
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Merge another validation result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Convert to BuilderResult (fails if any errors)
    pub fn to_result(self) -> BuilderResult<()> {
        if self.valid {
            Ok(())
        } else {
            let msg = self
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Err(BuilderError::InvalidSchema(msg))
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

// ============================================================================
// ValidationError / ValidationWarning
// ============================================================================

/// A validation error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error code for programmatic handling
    pub code: ValidationErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Path to the problematic element (e.g. `api::article.article.category`)
    pub path: Option<String>,
}

impl ValidationError {
    pub fn new(code: ValidationErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

/// Error codes for validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationErrorCode {
    DuplicateAttributeName,
    DanglingRelation,
    MissingMirror,
    AmbiguousMirror,
    DanglingComponent,
}

/// A validation warning (non-fatal issue)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationWarning {
    pub code: ValidationWarningCode,
    pub message: String,
    pub path: Option<String>,
}

impl ValidationWarning {
    pub fn new(code: ValidationWarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "[{}] Warning: {}", path, self.message),
            None => write!(f, "Warning: {}", self.message),
        }
    }
}

/// Warning codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationWarningCode {
    UnusualUid,
    EmptyDynamicZone,
}

// ============================================================================
// ValidationRule / Validator
// ============================================================================

/// One consistency check
pub trait ValidationRule {
    fn name(&self) -> &'static str;

    fn validate(&self, graph: &SchemaGraph) -> ValidationResult;
}

/// Runs a list of rules and merges their results
#[derive(Default)]
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Validator with every built-in rule
    pub fn with_default_rules() -> Self {
        let mut validator = Self::new();
        validator.add_rule(Box::new(AttributeNamesRule));
        validator.add_rule(Box::new(RelationPairsRule));
        validator.add_rule(Box::new(ComponentReferencesRule));
        validator.add_rule(Box::new(UidFormatRule));
        validator
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn validate(&self, graph: &SchemaGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for rule in &self.rules {
            let rule_result = rule.validate(graph);
            if rule_result.has_errors() {
                tracing::debug!(rule = rule.name(), errors = rule_result.errors.len(), "rule failed");
            }
            result.merge(rule_result);
        }
        result
    }
}

/// Run every built-in rule over `graph`
pub fn validate_graph(graph: &SchemaGraph) -> ValidationResult {
    Validator::with_default_rules().validate(graph)
}

/// Schemas and attributes still part of the graph (not flagged `REMOVED`)
fn live(graph: &SchemaGraph) -> impl Iterator<Item = &dyn SchemaEntity> {
    graph.entities().filter(|schema| !schema.is_removed())
}

fn path(schema: &dyn SchemaEntity, attribute: &str) -> String {
    format!("{}.{}", schema.uid(), attribute)
}

// ============================================================================
// Built-in Rules
// ============================================================================

/// No two attributes of a schema share a name
pub struct AttributeNamesRule;

impl ValidationRule for AttributeNamesRule {
    fn name(&self) -> &'static str {
        "attribute-names"
    }

    fn validate(&self, graph: &SchemaGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for schema in live(graph) {
            let mut seen = HashSet::new();
            for attribute in schema.attributes() {
                if !seen.insert(attribute.name.as_str()) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DuplicateAttributeName,
                            format!("attribute '{}' is defined twice", attribute.name),
                        )
                        .with_path(path(schema, &attribute.name)),
                    );
                }
            }
        }
        result
    }
}

/// Every two-sided relation points at an existing schema holding exactly
/// one inverse partner
pub struct RelationPairsRule;

impl ValidationRule for RelationPairsRule {
    fn name(&self) -> &'static str {
        "relation-pairs"
    }

    fn validate(&self, graph: &SchemaGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for schema in live(graph) {
            for attribute in schema.attributes().iter().filter(|a| !a.is_removed()) {
                let Some(relation) = attribute.as_relation() else {
                    continue;
                };
                let Ok(target) = graph.relation_target(&relation.target) else {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DanglingRelation,
                            format!("relation target {} does not exist", relation.target),
                        )
                        .with_path(path(schema, &attribute.name)),
                    );
                    continue;
                };
                if !relation.is_two_sided() {
                    continue;
                }

                let inverse = invert_relation_kind(relation.resolved_kind());
                let partners = target
                    .attributes()
                    .iter()
                    .filter(|a| !a.is_removed())
                    .filter(|a| {
                        a.as_relation().is_some_and(|r| {
                            r.target == schema.uid()
                                && r.target_attribute.as_deref() == Some(attribute.name.as_str())
                                && r.relation == inverse
                        })
                    })
                    .count();
                match partners {
                    1 => {}
                    0 => result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::MissingMirror,
                            format!("{} has no {inverse} partner on {}", attribute.name, target.uid()),
                        )
                        .with_path(path(schema, &attribute.name)),
                    ),
                    n => result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::AmbiguousMirror,
                            format!("{} has {n} partners on {}", attribute.name, target.uid()),
                        )
                        .with_path(path(schema, &attribute.name)),
                    ),
                }
            }
        }
        result
    }
}

/// Component attributes and dynamic zones name live components
pub struct ComponentReferencesRule;

impl ValidationRule for ComponentReferencesRule {
    fn name(&self) -> &'static str {
        "component-references"
    }

    fn validate(&self, graph: &SchemaGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        let exists = |uid: &str| graph.components.get(uid).is_some_and(|c| !c.is_removed());

        for schema in live(graph) {
            for attribute in schema.attributes().iter().filter(|a| !a.is_removed()) {
                let referenced: Vec<&str> = match (
                    attribute.component_uid(),
                    attribute.dynamic_zone_components(),
                ) {
                    (Some(uid), _) => vec![uid],
                    (None, Some(components)) => {
                        if components.is_empty() {
                            result.add_warning(
                                ValidationWarning::new(
                                    ValidationWarningCode::EmptyDynamicZone,
                                    "dynamic zone allows no component",
                                )
                                .with_path(path(schema, &attribute.name)),
                            );
                        }
                        components.iter().map(String::as_str).collect()
                    }
                    (None, None) => continue,
                };
                for uid in referenced.into_iter().filter(|uid| !exists(uid)) {
                    result.add_error(
                        ValidationError::new(
                            ValidationErrorCode::DanglingComponent,
                            format!("component {uid} does not exist"),
                        )
                        .with_path(path(schema, &attribute.name)),
                    );
                }
            }
        }
        result
    }
}

/// Uids follow `api::name.name` (content types) or `category.name`
/// (components)
pub struct UidFormatRule;

impl ValidationRule for UidFormatRule {
    fn name(&self) -> &'static str {
        "uid-format"
    }

    fn validate(&self, graph: &SchemaGraph) -> ValidationResult {
        let mut result = ValidationResult::ok();
        for schema in live(graph) {
            let pattern = match schema.for_target() {
                ForTarget::ContentType => &CONTENT_TYPE_UID,
                ForTarget::Component => &COMPONENT_UID,
            };
            if !pattern.is_match(schema.uid()) {
                result.add_warning(
                    ValidationWarning::new(
                        ValidationWarningCode::UnusualUid,
                        format!("{} uid '{}' has an unusual format", schema.for_target(), schema.uid()),
                    )
                    .with_path(schema.uid()),
                );
            }
        }
        result
    }
}

// ============================================================================
// Tests
// ============================================================================
