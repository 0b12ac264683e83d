//! Repeating sub-forms ("add another reference").
//!
//! A [`ListManager`] owns an ordered set of items built from one template. It
//! enforces minimum and maximum cardinality and aggregates the independently
//! computed validity of its children; it never looks at their fields itself.

use super::error::FormError;
use super::group::FieldGroup;
use super::rules::{Requirement, Requirements};
use log::*;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Builds a blank item for a list.
///
pub type ItemTemplate = Arc<dyn Fn() -> FieldGroup + Send + Sync>;

pub type ItemId = u64;

/// Result of submitting a whole list.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ListValidation {
    pub is_section_valid: bool,
    pub list_items: Vec<Map<String, Value>>,
}

/// One repeated sub-form.
///
/// Items seeded from saved data or that passed a submit are confirmed and
/// are protected by the list minimum; fresh blank rows are not.
#[derive(Clone, Debug)]
pub struct ListItem {
    id: ItemId,
    pub fields: FieldGroup,
    confirmed: bool,
}

impl ListItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    fn submit(&mut self) -> (bool, Map<String, Value>) {
        let result = self.fields.submit(&Requirements::default());
        if result.is_section_valid {
            self.confirmed = true;
        }
        (result.is_section_valid, result.item)
    }
}

#[derive(Clone)]
pub struct ListManager {
    name: String,
    template: ItemTemplate,
    items: Vec<ListItem>,
    min_items: usize,
    max_items: Option<usize>,
    next_id: ItemId,
}

impl fmt::Debug for ListManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListManager")
            .field("name", &self.name)
            .field("items", &self.items)
            .field("min_items", &self.min_items)
            .field("max_items", &self.max_items)
            .finish()
    }
}

impl ListManager {
    /// Seed from saved items, or with `min_items` blank items if there are
    /// none.
    pub fn initialize(
        name: &str,
        saved_items: &[Map<String, Value>],
        template: ItemTemplate,
        min_items: usize,
        max_items: Option<usize>,
    ) -> Self {
        let mut list = ListManager {
            name: name.to_string(),
            template,
            items: vec![],
            min_items,
            max_items,
            next_id: 0,
        };
        list.load(saved_items);
        list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_items(&self) -> usize {
        self.min_items
    }

    pub fn items(&self) -> &[ListItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.max_items.map(|max| self.items.len() >= max).unwrap_or(false)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Result<&mut ListItem, FormError> {
        let list = self.name.clone();
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(FormError::ItemNotFound { list, id })
    }

    fn blank_item(&mut self) -> ListItem {
        let id = self.next_id;
        self.next_id += 1;
        ListItem {
            id,
            fields: (self.template)(),
            confirmed: false,
        }
    }

    /// Replace all items with the saved ones, or with the minimum number of
    /// blank items when nothing was saved.
    pub fn load(&mut self, saved_items: &[Map<String, Value>]) -> &mut Self {
        self.items.clear();
        for saved in saved_items.iter() {
            let mut item = self.blank_item();
            item.fields.load(saved);
            item.confirmed = true;
            self.items.push(item);
        }
        if self.items.is_empty() {
            self.fill_to_minimum();
        }
        self
    }

    fn fill_to_minimum(&mut self) {
        while self.items.len() < self.min_items {
            let item = self.blank_item();
            self.items.push(item);
        }
    }

    /// Drop every item and start over with blank ones.
    ///
    pub fn reset(&mut self) -> &mut Self {
        debug!("Resetting list '{}'...", self.name);
        self.items.clear();
        self.fill_to_minimum();
        self
    }

    /// Append a blank item and return its id.
    ///
    pub fn add_item(&mut self) -> Result<ItemId, FormError> {
        if let Some(max) = self.max_items.filter(|_| self.is_full()) {
            warn!("Rejected add to list '{}': already at {} items.", self.name, max);
            return Err(FormError::ListFull {
                list: self.name.clone(),
                max,
            });
        }
        let item = self.blank_item();
        let id = item.id;
        self.items.push(item);
        debug!("Added item {} to list '{}'.", id, self.name);
        Ok(id)
    }

    /// Remove an item. Confirmed items cannot be removed below the minimum.
    ///
    pub fn remove_item(&mut self, id: ItemId) -> Result<(), FormError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(FormError::ItemNotFound {
                list: self.name.clone(),
                id,
            })?;
        if self.items[index].confirmed && self.items.len() <= self.min_items {
            warn!(
                "Rejected removal of confirmed item {} from list '{}': minimum is {}.",
                id, self.name, self.min_items
            );
            return Err(FormError::BelowMinimum {
                list: self.name.clone(),
                min: self.min_items,
            });
        }
        self.items.remove(index);
        debug!("Removed item {} from list '{}'.", id, self.name);
        Ok(())
    }

    /// Submit every child and aggregate. Invalid lists still return every
    /// child payload.
    pub fn submit(&mut self) -> ListValidation {
        self.submit_as(Requirement::Required)
    }

    /// Submit under a rule-decided requirement. An optional list only needs
    /// its existing items to be valid; a hidden one is always valid and
    /// empty.
    pub fn submit_as(&mut self, requirement: Requirement) -> ListValidation {
        if requirement == Requirement::Hidden {
            return ListValidation {
                is_section_valid: true,
                list_items: vec![],
            };
        }
        let mut all_valid = true;
        let mut list_items = Vec::with_capacity(self.items.len());
        for item in self.items.iter_mut() {
            let (valid, payload) = item.submit();
            all_valid &= valid;
            list_items.push(payload);
        }
        let enough = requirement == Requirement::Optional || self.items.len() >= self.min_items;
        if !enough {
            debug!(
                "List '{}' holds {} items but needs at least {}.",
                self.name,
                self.items.len(),
                self.min_items
            );
        }
        ListValidation {
            is_section_valid: all_valid && enough,
            list_items,
        }
    }

    pub fn is_valid(&self, requirement: Requirement) -> bool {
        match requirement {
            Requirement::Hidden => true,
            Requirement::Optional => self
                .items
                .iter()
                .all(|i| i.fields.is_valid(&Requirements::default())),
            Requirement::Required => {
                self.items.len() >= self.min_items
                    && self
                        .items
                        .iter()
                        .all(|i| i.fields.is_valid(&Requirements::default()))
            }
        }
    }

    pub fn force_validations(&mut self) {
        for item in self.items.iter_mut() {
            item.fields.force_validate(&Requirements::default());
        }
    }

    /// Errors visible in each item, as `(item id, field, message)`.
    ///
    pub fn visible_errors(&self) -> Vec<(ItemId, String, String)> {
        self.items
            .iter()
            .flat_map(|i| {
                i.fields
                    .visible_errors(&Requirements::default())
                    .into_iter()
                    .map(move |(field, message)| (i.id, field, message))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::field::FieldCell;
    use crate::form::validators;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;
    use serde_json::json;

    fn reference_template() -> ItemTemplate {
        Arc::new(|| {
            FieldGroup::new(vec![
                FieldCell::text("name").required(),
                FieldCell::text("email").required().validate(validators::email()),
            ])
        })
    }

    fn saved_reference() -> Map<String, Value> {
        let name: String = Name().fake();
        let email: String = SafeEmail().fake();
        json!({ "name": name, "email": email })
            .as_object()
            .cloned()
            .unwrap_or_default()
    }

    fn fill(list: &mut ListManager, id: ItemId) {
        let item = list.item_mut(id).unwrap();
        item.fields.enter("name", "Jane Doe").unwrap();
        item.fields.enter("email", "jane@example.com").unwrap();
    }

    #[test]
    fn test_initialize_with_minimum_blank_items() {
        let list = ListManager::initialize("references", &[], reference_template(), 2, None);
        assert_eq!(list.len(), 2);
        assert!(list.items().iter().all(|i| !i.is_confirmed()));
    }

    #[test]
    fn test_initialize_from_saved_items() {
        let saved = vec![saved_reference(), saved_reference(), saved_reference()];
        let list = ListManager::initialize("references", &saved, reference_template(), 2, None);
        assert_eq!(list.len(), 3);
        assert!(list.items().iter().all(|i| i.is_confirmed()));
    }

    #[test]
    fn test_below_minimum_is_invalid_even_if_items_are_valid() {
        let saved = vec![saved_reference()];
        let mut list = ListManager::initialize("references", &saved, reference_template(), 2, None);
        assert_eq!(list.len(), 1);
        let result = list.submit();
        assert!(!result.is_section_valid);
        assert_eq!(result.list_items.len(), 1);
    }

    #[test]
    fn test_submit_returns_partial_payload_when_invalid() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 2, None);
        let first = list.items()[0].id();
        fill(&mut list, first);
        let result = list.submit();
        assert!(!result.is_section_valid);
        assert_eq!(result.list_items.len(), 2);
        assert_eq!(result.list_items[0]["name"], json!("Jane Doe"));
        assert!(list.items()[0].is_confirmed());
        assert!(!list.items()[1].is_confirmed());
        assert!(list.items()[1].fields.get("name").unwrap().is_touched());
    }

    #[test]
    fn test_submit_valid_list() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 2, None);
        let ids: Vec<ItemId> = list.items().iter().map(|i| i.id()).collect();
        for id in ids {
            fill(&mut list, id);
        }
        let result = list.submit();
        assert!(result.is_section_valid);
        assert_eq!(result.list_items.len(), 2);
    }

    #[test]
    fn test_add_item_respects_maximum() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 0, Some(2));
        assert!(list.add_item().is_ok());
        assert!(list.add_item().is_ok());
        assert_eq!(
            list.add_item(),
            Err(FormError::ListFull {
                list: "references".to_string(),
                max: 2
            })
        );
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_item_ids_are_unique() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 1, None);
        let a = list.add_item().unwrap();
        list.remove_item(a).unwrap();
        let b = list.add_item().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unconfirmed_items_are_freely_removable() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 2, None);
        let id = list.items()[0].id();
        assert!(list.remove_item(id).is_ok());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_confirmed_items_guarded_by_minimum() {
        let saved = vec![saved_reference(), saved_reference()];
        let mut list = ListManager::initialize("references", &saved, reference_template(), 2, None);
        let id = list.items()[0].id();
        assert_eq!(
            list.remove_item(id),
            Err(FormError::BelowMinimum {
                list: "references".to_string(),
                min: 2
            })
        );

        let extra = list.add_item().unwrap();
        fill(&mut list, extra);
        list.submit();
        assert!(list.remove_item(id).is_ok());
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 0, None);
        assert!(matches!(
            list.remove_item(42),
            Err(FormError::ItemNotFound { id: 42, .. })
        ));
    }

    #[test]
    fn test_force_validations_reach_every_child() {
        let mut list = ListManager::initialize("references", &[], reference_template(), 2, None);
        assert!(list.visible_errors().is_empty());
        list.force_validations();
        assert_eq!(list.visible_errors().len(), 4);
    }

    #[test]
    fn test_optional_and_hidden_requirements() {
        let mut list =
            ListManager::initialize("stay_addresses", &[], reference_template(), 1, None);
        let id = list.items()[0].id();
        list.remove_item(id).unwrap();
        assert!(!list.is_valid(Requirement::Required));
        assert!(list.is_valid(Requirement::Optional));
        assert!(list.submit_as(Requirement::Optional).is_section_valid);
        let hidden = list.submit_as(Requirement::Hidden);
        assert!(hidden.is_section_valid);
        assert!(hidden.list_items.is_empty());
    }

    #[test]
    fn test_reset_restores_minimum() {
        let saved = vec![saved_reference(), saved_reference(), saved_reference()];
        let mut list = ListManager::initialize("references", &saved, reference_template(), 2, None);
        list.reset();
        assert_eq!(list.len(), 2);
        assert!(list.items().iter().all(|i| !i.is_confirmed()));
    }
}
