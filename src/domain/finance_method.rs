//! Finance-method articles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::provided;

/// Image used when an article is created without one
pub const DEFAULT_IMAGE_URL: &str = "https://via.placeholder.com/400x300?text=Finance+Method";

/// Stored article. `created_by` holds the id of the authoring user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceMethod {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub methodology: String,
    pub benefits: Vec<String>,
    pub image_url: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFinanceMethod {
    pub title: String,
    pub description: String,
    pub category: String,
    pub methodology: String,
    pub benefits: Vec<String>,
    pub image_url: Option<String>,
    pub created_by: Uuid,
}

/// Partial update. Absent or blank fields leave the stored value untouched;
/// a `benefits` list, even an empty one, replaces the stored list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceMethodChanges {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub methodology: Option<String>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub image_url: Option<String>,
}

fn trim_benefits(benefits: Vec<String>) -> Vec<String> {
    benefits.into_iter().map(|b| b.trim().to_string()).collect()
}

impl FinanceMethod {
    pub fn create(new: NewFinanceMethod, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            title: new.title.trim().to_string(),
            description: new.description.trim().to_string(),
            category: new.category.trim().to_string(),
            methodology: new.methodology.trim().to_string(),
            benefits: trim_benefits(new.benefits),
            image_url: provided(new.image_url).unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string()),
            created_by: Some(new.created_by),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: FinanceMethodChanges, now: DateTime<Utc>) {
        if let Some(title) = provided(changes.title) {
            self.title = title;
        }
        if let Some(description) = provided(changes.description) {
            self.description = description;
        }
        if let Some(category) = provided(changes.category) {
            self.category = category;
        }
        if let Some(methodology) = provided(changes.methodology) {
            self.methodology = methodology;
        }
        if let Some(benefits) = changes.benefits {
            self.benefits = trim_benefits(benefits);
        }
        if let Some(image_url) = provided(changes.image_url) {
            self.image_url = image_url;
        }
        self.updated_at = now;
    }
}

/// Public identity of an article's author
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Article as returned by reads, with the author expanded. The author is
/// `None` when the referenced user no longer exists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceMethodView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub methodology: String,
    pub benefits: Vec<String>,
    pub image_url: String,
    pub created_by: Option<Author>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FinanceMethodView {
    pub fn new(method: FinanceMethod, author: Option<Author>) -> Self {
        Self {
            id: method.id,
            title: method.title,
            description: method.description,
            category: method.category,
            methodology: method.methodology,
            benefits: method.benefits,
            image_url: method.image_url,
            created_by: author,
            created_at: method.created_at,
            updated_at: method.updated_at,
        }
    }
}

/// List filters: exact `category`, and a case-insensitive `search` over
/// title, description and category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinanceMethodFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl FinanceMethodFilter {
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            search: search.filter(|s| !s.is_empty()),
        }
    }

    pub fn matches(&self, method: &FinanceMethod) -> bool {
        if let Some(category) = &self.category {
            if &method.category != category {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [&method.title, &method.description, &method.category]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}
