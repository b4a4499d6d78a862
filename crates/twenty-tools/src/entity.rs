//! CRM entity catalogue.

use std::fmt;

/// Record collections exposed as tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    People,
    Companies,
    Opportunities,
    Notes,
    Tasks,
}

impl Entity {
    pub const ALL: [Entity; 5] = [
        Entity::People,
        Entity::Companies,
        Entity::Opportunities,
        Entity::Notes,
        Entity::Tasks,
    ];

    /// REST object name, also used as the plural noun (`people`).
    pub fn object(&self) -> &'static str {
        match self {
            Entity::People => "people",
            Entity::Companies => "companies",
            Entity::Opportunities => "opportunities",
            Entity::Notes => "notes",
            Entity::Tasks => "tasks",
        }
    }

    /// Singular noun (`person`).
    pub fn singular(&self) -> &'static str {
        match self {
            Entity::People => "person",
            Entity::Companies => "company",
            Entity::Opportunities => "opportunity",
            Entity::Notes => "note",
            Entity::Tasks => "task",
        }
    }

    /// Capitalised singular noun used in messages (`Person`).
    pub fn label(&self) -> &'static str {
        match self {
            Entity::People => "Person",
            Entity::Companies => "Company",
            Entity::Opportunities => "Opportunity",
            Entity::Notes => "Note",
            Entity::Tasks => "Task",
        }
    }

    /// Key some deployments wrap single-record payloads in (`findPerson`).
    pub fn find_key(&self) -> String {
        format!("find{}", self.label())
    }

    /// Notes and tasks have no search endpoints.
    pub fn supports_search(&self) -> bool {
        matches!(
            self,
            Entity::People | Entity::Companies | Entity::Opportunities
        )
    }

    /// Look up an entity by its REST object name.
    pub fn from_object(name: &str) -> Option<Entity> {
        Self::ALL.into_iter().find(|e| e.object() == name)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object())
    }
}
