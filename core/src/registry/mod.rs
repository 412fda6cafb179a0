//! Line schema registry: type tag → immutable `LineSchema`.

mod builtin;
pub mod config;
pub mod schema;

pub use builtin::{NPC_ID, builtin_schemas};
pub use config::{DefinitionFile, RegistryError, load_definitions, load_file, save_file};
pub use schema::{AnalysisInclusion, FieldConstraint, FieldFilter, LineRole, LineSchema};

use hashbrown::HashMap;

/// Lookup table of line schemas keyed by type tag.
///
/// Built once per run and shared read-only between engines (wrap it in an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct LineRegistry {
    schemas: HashMap<String, LineSchema>,
}

impl LineRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in network log definitions
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for schema in builtin_schemas() {
            registry.insert(schema);
        }
        registry
    }

    /// Insert a schema, returning the one it replaced
    pub fn insert(&mut self, schema: LineSchema) -> Option<LineSchema> {
        self.schemas.insert(schema.tag.clone(), schema)
    }

    /// Add every schema from a definition file, returns tags that replaced an existing entry
    pub fn add_definitions(&mut self, file: DefinitionFile) -> Vec<String> {
        let mut replaced = Vec::new();
        for schema in file.lines {
            let tag = schema.tag.clone();
            if self.insert(schema).is_some() {
                replaced.push(tag);
            }
        }
        replaced
    }

    pub fn get(&self, tag: &str) -> Option<&LineSchema> {
        self.schemas.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.schemas.contains_key(tag)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineSchema> {
        self.schemas.values()
    }

    /// All schemas sorted by numeric tag, for stable output
    pub fn sorted(&self) -> Vec<&LineSchema> {
        let mut schemas: Vec<_> = self.schemas.values().collect();
        schemas.sort_by(|a, b| {
            let a_num = a.tag.parse::<u32>().unwrap_or(u32::MAX);
            let b_num = b.tag.parse::<u32>().unwrap_or(u32::MAX);
            a_num.cmp(&b_num).then_with(|| a.tag.cmp(&b.tag))
        });
        schemas
    }
}
