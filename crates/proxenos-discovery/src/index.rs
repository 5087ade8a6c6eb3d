//! Extension-to-action indexing.
//!
//! A resolved discovery document is flattened into a [`DiscoveryIndex`]:
//! one lookup table keyed by `(action, extension)`. Applications are shared
//! across their actions by reference and live as long as the index.

use crate::document::DiscoveryDocument;
use crate::error::{DiscoveryError, DiscoveryResult};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One editor vendor application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Display name (e.g. "Excel").
    pub name: String,
    /// Icon URL.
    pub icon_url: String,
}

/// Action verb carried by a discovery `action` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionName {
    /// Read-only viewing.
    View,
    /// Editing.
    Edit,
    /// Any other verb (e.g. "editnew", "mobileView"), retained for
    /// generalized lookup but excluded from the view/edit indices.
    Other(String),
}

impl ActionName {
    /// Parses a verb from its discovery document spelling.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "view" => Self::View,
            "edit" => Self::Edit,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns the verb as it appears in the discovery document.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved action: application, verb, extension, and URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The application this action belongs to.
    pub app: Arc<Application>,
    /// The action verb.
    pub name: ActionName,
    /// The file extension, lowercased.
    pub extension: String,
    /// The session URL template (`urlsrc`).
    pub url_template: String,
}

/// Lookup table mapping `(action, extension)` to a single [`Action`].
///
/// Collision policy: **first-seen wins**. The table is built in document
/// order and an existing entry is never replaced, so lookups stay
/// deterministic across rebuilds of the same document.
#[derive(Debug, Default)]
pub struct DiscoveryIndex {
    actions: HashMap<(ActionName, String), Arc<Action>>,
}

impl DiscoveryIndex {
    /// Builds the index from a parsed discovery document.
    ///
    /// Extensions are lowercased on insert and lookup. Actions without an
    /// extension (URL-scheme actions) are skipped.
    #[must_use]
    pub fn from_document(document: &DiscoveryDocument) -> Self {
        let mut actions = HashMap::new();

        for app_entry in &document.apps {
            let app = Arc::new(Application {
                name: app_entry.name.clone(),
                icon_url: app_entry.fav_icon_url.clone(),
            });

            for action_entry in &app_entry.actions {
                if action_entry.ext.is_empty() {
                    continue;
                }

                let name = ActionName::parse(&action_entry.name);
                let extension = action_entry.ext.to_ascii_lowercase();
                let key = (name.clone(), extension.clone());

                actions.entry(key).or_insert_with(|| {
                    Arc::new(Action {
                        app: Arc::clone(&app),
                        name,
                        extension,
                        url_template: action_entry.urlsrc.clone(),
                    })
                });
            }
        }

        Self { actions }
    }

    /// Looks up an action by verb and extension.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoveryError::ActionNotFound`] when no action matches.
    pub fn find(&self, name: &ActionName, extension: &str) -> DiscoveryResult<Arc<Action>> {
        let key = (name.clone(), extension.to_ascii_lowercase());
        self.actions
            .get(&key)
            .cloned()
            .ok_or_else(|| DiscoveryError::action_not_found(name.as_str(), extension))
    }

    /// Looks up the view action for an extension.
    pub fn find_view(&self, extension: &str) -> DiscoveryResult<Arc<Action>> {
        self.find(&ActionName::View, extension)
    }

    /// Looks up the edit action for an extension.
    pub fn find_edit(&self, extension: &str) -> DiscoveryResult<Arc<Action>> {
        self.find(&ActionName::Edit, extension)
    }

    /// Number of indexed `(action, extension)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` when nothing was indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ActionEntry, AppEntry};

    fn doc(apps: Vec<AppEntry>) -> DiscoveryDocument {
        DiscoveryDocument { apps }
    }

    fn app(name: &str, actions: Vec<ActionEntry>) -> AppEntry {
        AppEntry {
            name: name.to_string(),
            fav_icon_url: format!("https://c.example/{name}.ico"),
            actions,
        }
    }

    fn action(name: &str, ext: &str, urlsrc: &str) -> ActionEntry {
        ActionEntry {
            name: name.to_string(),
            ext: ext.to_string(),
            urlsrc: urlsrc.to_string(),
        }
    }

    #[test]
    fn test_index_and_lookup() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Excel",
            vec![
                action("view", "xlsx", "https://x.example/view"),
                action("edit", "xlsx", "https://x.example/edit"),
            ],
        )]));

        assert_eq!(index.len(), 2);
        let view = index.find_view("xlsx").unwrap();
        assert_eq!(view.url_template, "https://x.example/view");
        assert_eq!(view.app.name, "Excel");

        let edit = index.find_edit("xlsx").unwrap();
        assert_eq!(edit.name, ActionName::Edit);
    }

    #[test]
    fn test_absent_extension_is_action_not_found() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Excel",
            vec![action("view", "xlsx", "https://x.example/view")],
        )]));

        let result = index.find_view("pptx");
        assert!(matches!(result, Err(DiscoveryError::ActionNotFound { .. })));
        assert!(index.find_edit("xlsx").is_err());
    }

    #[test]
    fn test_first_seen_wins_on_collision() {
        let index = DiscoveryIndex::from_document(&doc(vec![
            app("Excel", vec![action("view", "csv", "https://x.example/view")]),
            app("Word", vec![action("view", "csv", "https://w.example/view")]),
        ]));

        let view = index.find_view("csv").unwrap();
        assert_eq!(view.app.name, "Excel");
        assert_eq!(view.url_template, "https://x.example/view");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_other_actions_do_not_shadow_view_or_edit() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Word",
            vec![action("editnew", "docx", "https://w.example/new")],
        )]));

        assert!(index.find_view("docx").is_err());
        assert!(index.find_edit("docx").is_err());

        let editnew = index
            .find(&ActionName::Other("editnew".to_string()), "docx")
            .unwrap();
        assert_eq!(editnew.url_template, "https://w.example/new");
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Excel",
            vec![action("view", "XLSX", "https://x.example/view")],
        )]));

        assert!(index.find_view("xlsx").is_ok());
        assert!(index.find_view("XlSx").is_ok());
    }

    #[test]
    fn test_applications_shared_across_actions() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Excel",
            vec![
                action("view", "xlsx", "https://x.example/view"),
                action("edit", "xlsx", "https://x.example/edit"),
            ],
        )]));

        let view = index.find_view("xlsx").unwrap();
        let edit = index.find_edit("xlsx").unwrap();
        assert!(Arc::ptr_eq(&view.app, &edit.app));
    }

    #[test]
    fn test_extensionless_actions_skipped() {
        let index = DiscoveryIndex::from_document(&doc(vec![app(
            "Broker",
            vec![action("view", "", "https://b.example/open")],
        )]));

        assert!(index.is_empty());
    }
}
