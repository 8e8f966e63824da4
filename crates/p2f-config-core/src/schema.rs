// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON Schema description of the conversion config.
//!
//! The schema is built from an explicit field table rather than from type
//! introspection: each section lists its fields with a [`FieldType`] and a
//! default, and a small set of named augmentations adds patterns and
//! descriptions. The output depends only on the table, never on a config
//! instance.

use crate::pages::OPTIONAL_PAGE_SELECTION_PATTERN;
use crate::validate::MODULE_ID_PATTERN;
use p2f_config_types::{
    CachingSection, ConversionSection, CoreSection, LoggingSection, ModuleSection, OcrMode,
    OutputSection, PerformanceSection, TableMode, VerbosityLevel,
};
use serde::Serialize;
use serde_json::{json, Map, Value as J};

/// JSON Schema dialect the generated document declares
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// Title of the generated document
pub const SCHEMA_TITLE: &str = "PDF2Foundry Conversion Config";

/// Declared type of a config field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer,
    Boolean,
    Number,
    /// String restricted to a closed set of values
    Enum(&'static [&'static str]),
    /// May be omitted; described by its underlying type
    Optional(Box<FieldType>),
    /// Homogeneous sequence
    Array(Box<FieldType>),
    /// Fixed-size heterogeneous sequence
    Tuple(Vec<FieldType>),
}

/// One row of the field table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub default: J,
}

/// One section of the config with its field table
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpec {
    pub name: &'static str,
    pub fields: Vec<FieldSpec>,
    pub required: &'static [&'static str],
}

/// Extra schema keywords attached to a field by name
struct Augmentation {
    field: &'static str,
    pattern: Option<&'static str>,
    description: &'static str,
}

const AUGMENTATIONS: &[Augmentation] = &[
    Augmentation {
        field: "pdf",
        pattern: None,
        description: "Path to the source PDF document",
    },
    Augmentation {
        field: "mod_id",
        pattern: Some(MODULE_ID_PATTERN),
        description: "Module identifier: lowercase letters and digits separated by single hyphens",
    },
    Augmentation {
        field: "out_dir",
        pattern: None,
        description: "Directory the generated module is written into",
    },
    Augmentation {
        field: "pages",
        pattern: Some(OPTIONAL_PAGE_SELECTION_PATTERN),
        description: "Comma-separated pages and ranges such as 1,5-10; empty selects all pages",
    },
];

fn field(name: &'static str, ty: FieldType, default: J) -> FieldSpec {
    FieldSpec { name, ty, default }
}

/// Serialized default of one field, taken from the section's own `Default`
fn default_of<T: Default + Serialize>(name: &str) -> J {
    serde_json::to_value(T::default())
        .ok()
        .and_then(|section| section.get(name).cloned())
        .unwrap_or(J::Null)
}

/// Field tables for all seven sections, in declaration order
pub fn section_specs() -> Vec<SectionSpec> {
    use FieldType::*;

    vec![
        SectionSpec {
            name: "core",
            fields: vec![
                field("pdf", String, default_of::<CoreSection>("pdf")),
                field("mod_id", String, default_of::<CoreSection>("mod_id")),
                field("mod_title", String, default_of::<CoreSection>("mod_title")),
                field("out_dir", String, default_of::<CoreSection>("out_dir")),
            ],
            required: &["pdf", "mod_id", "mod_title", "out_dir"],
        },
        SectionSpec {
            name: "module",
            fields: vec![
                field("author", String, default_of::<ModuleSection>("author")),
                field("license", String, default_of::<ModuleSection>("license")),
                field("pack_name", String, default_of::<ModuleSection>("pack_name")),
                field("toc", Boolean, default_of::<ModuleSection>("toc")),
                field(
                    "deterministic_ids",
                    Boolean,
                    default_of::<ModuleSection>("deterministic_ids"),
                ),
            ],
            required: &[],
        },
        SectionSpec {
            name: "conversion",
            fields: vec![
                field(
                    "tables",
                    Enum(TableMode::VALUES),
                    default_of::<ConversionSection>("tables"),
                ),
                field(
                    "ocr",
                    Enum(OcrMode::VALUES),
                    default_of::<ConversionSection>("ocr"),
                ),
                field(
                    "picture_descriptions",
                    Boolean,
                    default_of::<ConversionSection>("picture_descriptions"),
                ),
                field(
                    "vlm_repo_id",
                    String,
                    default_of::<ConversionSection>("vlm_repo_id"),
                ),
            ],
            required: &[],
        },
        SectionSpec {
            name: "performance",
            fields: vec![
                field("pages", String, default_of::<PerformanceSection>("pages")),
                field("workers", Integer, default_of::<PerformanceSection>("workers")),
                field(
                    "reflow_columns",
                    Boolean,
                    default_of::<PerformanceSection>("reflow_columns"),
                ),
            ],
            required: &[],
        },
        SectionSpec {
            name: "caching",
            fields: vec![
                field(
                    "docling_json",
                    Optional(Box::new(String)),
                    default_of::<CachingSection>("docling_json"),
                ),
                field(
                    "write_docling_json",
                    Boolean,
                    default_of::<CachingSection>("write_docling_json"),
                ),
                field(
                    "fallback_on_json_failure",
                    Boolean,
                    default_of::<CachingSection>("fallback_on_json_failure"),
                ),
            ],
            required: &[],
        },
        SectionSpec {
            name: "output",
            fields: vec![field(
                "compile_pack",
                Boolean,
                default_of::<OutputSection>("compile_pack"),
            )],
            required: &[],
        },
        SectionSpec {
            name: "logging",
            fields: vec![field(
                "verbose",
                Enum(VerbosityLevel::VALUES),
                default_of::<LoggingSection>("verbose"),
            )],
            required: &[],
        },
    ]
}

/// Schema fragment for a field type
pub fn field_type_schema(ty: &FieldType) -> J {
    match ty {
        FieldType::String => json!({ "type": "string" }),
        FieldType::Integer => json!({ "type": "integer" }),
        FieldType::Boolean => json!({ "type": "boolean" }),
        FieldType::Number => json!({ "type": "number" }),
        FieldType::Enum(values) => json!({ "type": "string", "enum": values }),
        FieldType::Optional(inner) => field_type_schema(inner),
        FieldType::Array(item) => json!({ "type": "array", "items": field_type_schema(item) }),
        FieldType::Tuple(items) => {
            let len = items.len();
            let items: Vec<J> = items.iter().map(field_type_schema).collect();
            json!({
                "type": "array",
                "items": items,
                "minItems": len,
                "maxItems": len,
            })
        }
    }
}

/// Defaults worth showing in a form; empty placeholders are left out
fn is_meaningful_default(value: &J) -> bool {
    match value {
        J::Null => false,
        J::Bool(b) => *b,
        J::Number(n) => n.as_f64() != Some(0.0),
        J::String(s) => !s.is_empty(),
        J::Array(items) => !items.is_empty(),
        J::Object(map) => !map.is_empty(),
    }
}

/// Schema of one field: type mapping plus augmentations and default
pub fn field_schema(spec: &FieldSpec) -> J {
    let mut schema = field_type_schema(&spec.ty);
    let Some(obj) = schema.as_object_mut() else {
        return schema;
    };

    if let Some(aug) = AUGMENTATIONS.iter().find(|a| a.field == spec.name) {
        if let Some(pattern) = aug.pattern {
            obj.insert("pattern".into(), J::String(pattern.into()));
        }
        obj.insert("description".into(), J::String(aug.description.into()));
    }

    if is_meaningful_default(&spec.default) {
        obj.insert("default".into(), spec.default.clone());
    }

    schema
}

/// Schema of one section object
pub fn section_schema(section: &SectionSpec) -> J {
    let mut properties = Map::new();
    for spec in &section.fields {
        properties.insert(spec.name.into(), field_schema(spec));
    }

    let mut schema = Map::new();
    schema.insert("type".into(), J::String("object".into()));
    schema.insert("properties".into(), J::Object(properties));
    if !section.required.is_empty() {
        schema.insert("required".into(), json!(section.required));
    }
    J::Object(schema)
}

/// The full schema document for `ConversionConfig`
pub fn generate_schema() -> J {
    let mut properties = Map::new();
    for section in section_specs() {
        properties.insert(section.name.into(), section_schema(&section));
    }

    json!({
        "$schema": SCHEMA_DIALECT,
        "title": SCHEMA_TITLE,
        "type": "object",
        "properties": properties,
        "required": ["core"],
        "additionalProperties": false,
    })
}

/// Pretty-printed schema artifact
pub fn schema_text() -> String {
    serde_json::to_string_pretty(&generate_schema()).unwrap_or_default()
}
