//! Typed CRUD on top of the record store
//!
//! One generic [`Repository`] serves every entity type. Each operation
//! re-reads the whole collection, mutates it in memory and writes it back;
//! nothing is cached between calls.

use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;
use crate::store::{Collection, RecordStore};
use crate::types::Todo;

/// Schema of a stored record type: where it lives, how it is validated on
/// creation and how partial updates merge into it.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Display name used in messages ("Group not found")
    const NAME: &'static str;

    /// Creation payload
    type New: DeserializeOwned + Send + 'static;
    /// Partial update payload
    type Patch: DeserializeOwned + Default + Send + 'static;

    fn id(&self) -> &str;

    /// Validate required fields and fill in defaults
    fn from_new(id: String, input: Self::New) -> Result<Self, AppError>;

    /// Merge the supplied fields, leaving absent ones untouched
    fn apply(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone)]
pub struct Repository<E> {
    store: RecordStore,
    _entity: PhantomData<E>,
}

impl<E: Entity> Repository<E> {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    /// All records in stored order
    pub fn list(&self) -> Result<Vec<E>, AppError> {
        self.store.read(E::COLLECTION)
    }

    pub fn get(&self, id: &str) -> Result<E, AppError> {
        self.list()?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::not_found(E::NAME, id))
    }

    pub fn create(&self, input: E::New) -> Result<E, AppError> {
        let record = E::from_new(Uuid::new_v4().to_string(), input)?;

        let mut records = self.list()?;
        records.push(record.clone());
        self.store.write(E::COLLECTION, &records)?;

        info!(collection = %E::COLLECTION, id = %record.id(), "Created record");
        Ok(record)
    }

    pub fn update(&self, id: &str, patch: E::Patch) -> Result<E, AppError> {
        let record = self.modify(id, |record| record.apply(patch))?;
        debug!(collection = %E::COLLECTION, id = %id, "Updated record");
        Ok(record)
    }

    /// Remove a record, returning the confirmation message
    pub fn delete(&self, id: &str) -> Result<String, AppError> {
        let mut records = self.list()?;
        let before = records.len();
        records.retain(|record| record.id() != id);

        if records.len() == before {
            return Err(AppError::not_found(E::NAME, id));
        }

        self.store.write(E::COLLECTION, &records)?;
        info!(collection = %E::COLLECTION, id = %id, "Deleted record");
        Ok(format!("{} deleted", E::NAME))
    }

    /// Apply `change` to the record with `id` in place and persist the
    /// whole collection
    fn modify(&self, id: &str, change: impl FnOnce(&mut E)) -> Result<E, AppError> {
        let mut records = self.list()?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::not_found(E::NAME, id))?;

        change(record);
        let updated = record.clone();

        self.store.write(E::COLLECTION, &records)?;
        Ok(updated)
    }
}

impl Repository<Todo> {
    /// Flip the completion flag of a to-do
    pub fn toggle_complete(&self, id: &str) -> Result<Todo, AppError> {
        let todo = self.modify(id, |todo| todo.completed = !todo.completed)?;
        debug!(id = %id, completed = todo.completed, "Toggled todo");
        Ok(todo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ClassEntity, ClassPatch, Exam, NewClass, NewExam, NewStudyGroup, NewTodo, StudyGroup,
        TodoPatch,
    };
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, RecordStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::new(temp_dir.path());
        store.init().unwrap();
        (temp_dir, store)
    }

    fn new_todo(title: &str) -> NewTodo {
        NewTodo {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn new_class(name: &str, code: &str) -> NewClass {
        NewClass {
            name: Some(name.to_string()),
            code: Some(code.to_string()),
            instructor: Some("Dr. Lee".to_string()),
            schedule: Some("Mon 10:00".to_string()),
        }
    }

    // ========== create/get tests ==========

    #[test]
    fn test_create_then_get_returns_same_record() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<StudyGroup>::new(store);

        let created = repo
            .create(NewStudyGroup {
                name: Some("CS Study".to_string()),
                description: Some("Weekly".to_string()),
                members: Some(vec!["Alice".to_string(), "Bob".to_string()]),
            })
            .unwrap();

        assert!(!created.id.is_empty());
        let fetched = repo.get(&created.id).unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.members, vec!["Alice".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_create_assigns_unique_ids() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);

        let a = repo.create(new_todo("A")).unwrap();
        let b = repo.create(new_todo("B")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_create_validation_does_not_touch_collection() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Exam>::new(store);

        let err = repo.create(NewExam::default()).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_create_exam_with_dangling_class_id() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Exam>::new(store);

        let exam = repo
            .create(NewExam {
                class_id: Some("no-such-class".to_string()),
                exam_type: Some("Quiz".to_string()),
                date: Some("2025-05-02".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(exam.class_id, "no-such-class");
        assert_eq!(exam.time, "");
        assert_eq!(exam.location, "");
    }

    #[test]
    fn test_list_keeps_insertion_order() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);

        for title in ["first", "second", "third"] {
            repo.create(new_todo(title)).unwrap();
        }

        let titles: Vec<String> = repo.list().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    // ========== not found tests ==========

    #[test]
    fn test_unknown_id_is_not_found_everywhere() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);
        repo.create(new_todo("present")).unwrap();

        assert!(matches!(repo.get("missing"), Err(AppError::NotFound { .. })));
        assert!(matches!(
            repo.update("missing", TodoPatch::default()),
            Err(AppError::NotFound { .. })
        ));
        assert!(matches!(repo.delete("missing"), Err(AppError::NotFound { .. })));
        assert!(matches!(
            repo.toggle_complete("missing"),
            Err(AppError::NotFound { .. })
        ));
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_not_found_message_names_entity() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<ClassEntity>::new(store);

        let err = repo.get("x").unwrap_err();
        assert_eq!(err.to_string(), "Class not found");
    }

    // ========== update tests ==========

    #[test]
    fn test_empty_update_leaves_record_unchanged() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<ClassEntity>::new(store);
        let class = repo.create(new_class("Physics", "PHY101")).unwrap();

        let updated = repo.update(&class.id, ClassPatch::default()).unwrap();
        assert_eq!(updated, class);
        assert_eq!(repo.get(&class.id).unwrap(), class);
    }

    #[test]
    fn test_update_changes_exactly_one_field() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<ClassEntity>::new(store);
        let class = repo.create(new_class("Physics", "PHY101")).unwrap();

        let patch: ClassPatch = serde_json::from_str(r#"{"schedule": "Fri 14:00"}"#).unwrap();
        let updated = repo.update(&class.id, patch).unwrap();

        assert_eq!(
            updated,
            ClassEntity {
                schedule: "Fri 14:00".to_string(),
                ..class.clone()
            }
        );
        assert_eq!(updated.id, class.id);
    }

    #[test]
    fn test_update_persists_and_keeps_position() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);
        let first = repo.create(new_todo("first")).unwrap();
        repo.create(new_todo("second")).unwrap();

        let patch: TodoPatch = serde_json::from_str(r#"{"title": "renamed"}"#).unwrap();
        repo.update(&first.id, patch).unwrap();

        let todos = repo.list().unwrap();
        assert_eq!(todos[0].id, first.id);
        assert_eq!(todos[0].title, "renamed");
        assert_eq!(todos[1].title, "second");
    }

    // ========== delete tests ==========

    #[test]
    fn test_delete_removes_only_target() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);
        let a = repo.create(new_todo("a")).unwrap();
        let b = repo.create(new_todo("b")).unwrap();
        let c = repo.create(new_todo("c")).unwrap();

        let message = repo.delete(&b.id).unwrap();
        assert_eq!(message, "Todo deleted");

        let ids: Vec<String> = repo.list().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, c.id]);
        assert!(matches!(repo.get(&b.id), Err(AppError::NotFound { .. })));
    }

    // ========== toggle tests ==========

    #[test]
    fn test_toggle_twice_restores_original() {
        let (_temp_dir, store) = setup_store();
        let repo = Repository::<Todo>::new(store);
        let todo = repo.create(new_todo("toggle me")).unwrap();
        assert!(!todo.completed);

        let once = repo.toggle_complete(&todo.id).unwrap();
        assert!(once.completed);
        assert!(repo.get(&todo.id).unwrap().completed);

        let twice = repo.toggle_complete(&todo.id).unwrap();
        assert_eq!(twice, todo);
    }

    // ========== storage failure tests ==========

    #[test]
    fn test_missing_collection_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let repo = Repository::<StudyGroup>::new(RecordStore::new(temp_dir.path()));

        let err = repo.list().unwrap_err();
        assert!(err.is_internal());
    }
}
