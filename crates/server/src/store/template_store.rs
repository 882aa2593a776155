use dashmap::DashMap;
use std::sync::Arc;

use super::template_record::TemplateRecord;

#[derive(Clone)]
pub struct TemplateStore {
    templates: Arc<DashMap<String, TemplateRecord>>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    pub fn new() -> Self {
        Self {
            templates: Arc::new(DashMap::new()),
        }
    }

    pub fn insert(&self, record: TemplateRecord) {
        self.templates.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<TemplateRecord> {
        self.templates.get(id).map(|r| r.clone())
    }

    /// All templates sorted by name for stable listings.
    pub fn list(&self) -> Vec<TemplateRecord> {
        let mut all: Vec<TemplateRecord> =
            self.templates.iter().map(|r| r.value().clone()).collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    pub fn update(&self, record: TemplateRecord) -> bool {
        if self.templates.contains_key(&record.id) {
            self.templates.insert(record.id.clone(), record);
            true
        } else {
            false
        }
    }

    pub fn delete(&self, id: &str) -> bool {
        self.templates.remove(id).is_some()
    }

    pub fn count(&self) -> usize {
        self.templates.len()
    }
}
