use serde::{Deserialize, Deserializer, Serialize};

use crate::error::AppError;
use crate::repository::Entity;
use crate::store::Collection;

/// Deserialize a patch field so that an explicit `null` is kept apart from
/// an absent field: absent stays `None` (via `#[serde(default)]`), `null`
/// becomes `Some(None)` and a value becomes `Some(Some(v))`.
fn explicit<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `slot` when the patch supplied the field; `null` resets it to
/// the type's default
fn merge<T: Default>(slot: &mut T, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *slot = value.unwrap_or_default();
    }
}

/// Same as [`merge`] for fields that are themselves nullable
fn merge_nullable<T>(slot: &mut Option<T>, patch: Option<Option<T>>) {
    if let Some(value) = patch {
        *slot = value;
    }
}

/// Collects required fields during creation, remembering which ones are
/// missing. Absent, null and empty strings all count as missing.
#[derive(Default)]
struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    fn take(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(v) if !v.is_empty() => v,
            _ => {
                self.missing.push(field);
                String::new()
            }
        }
    }

    fn check(self) -> Result<(), AppError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::missing_fields(&self.missing))
        }
    }
}

/// Empty strings are stored as null for nullable fields
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ========== Study groups ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudyGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Member names in the order they were added; duplicates are allowed
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewStudyGroup {
    pub name: Option<String>,
    pub description: Option<String>,
    pub members: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudyGroupPatch {
    #[serde(default, deserialize_with = "explicit")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub members: Option<Option<Vec<String>>>,
}

impl Entity for StudyGroup {
    const COLLECTION: Collection = Collection::Groups;
    const NAME: &'static str = "Group";

    type New = NewStudyGroup;
    type Patch = StudyGroupPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, input: NewStudyGroup) -> Result<Self, AppError> {
        let mut required = Required::default();
        let name = required.take("name", input.name);
        required.check()?;

        Ok(Self {
            id,
            name,
            description: input.description.unwrap_or_default(),
            members: input.members.unwrap_or_default(),
        })
    }

    fn apply(&mut self, patch: StudyGroupPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.description, patch.description);
        merge(&mut self.members, patch.members);
    }
}

// ========== To-dos ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Due date in YYYY-MM-DD format
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Creation input for a to-do. A client-supplied `completed` flag is
/// ignored; new to-dos always start open.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTodo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    #[serde(default, deserialize_with = "explicit")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub assigned_to: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub completed: Option<Option<bool>>,
}

impl Entity for Todo {
    const COLLECTION: Collection = Collection::Todos;
    const NAME: &'static str = "Todo";

    type New = NewTodo;
    type Patch = TodoPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, input: NewTodo) -> Result<Self, AppError> {
        let mut required = Required::default();
        let title = required.take("title", input.title);
        required.check()?;

        Ok(Self {
            id,
            title,
            description: input.description.unwrap_or_default(),
            due_date: non_empty(input.due_date),
            assigned_to: non_empty(input.assigned_to),
            completed: false,
        })
    }

    fn apply(&mut self, patch: TodoPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge_nullable(&mut self.due_date, patch.due_date);
        merge_nullable(&mut self.assigned_to, patch.assigned_to);
        merge(&mut self.completed, patch.completed);
    }
}

// ========== Classes ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub instructor: String,
    /// Free text, e.g. "Mon/Wed 10:00"
    #[serde(default)]
    pub schedule: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClass {
    pub name: Option<String>,
    pub code: Option<String>,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassPatch {
    #[serde(default, deserialize_with = "explicit")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub code: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub instructor: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub schedule: Option<Option<String>>,
}

impl Entity for ClassEntity {
    const COLLECTION: Collection = Collection::Classes;
    const NAME: &'static str = "Class";

    type New = NewClass;
    type Patch = ClassPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, input: NewClass) -> Result<Self, AppError> {
        let mut required = Required::default();
        let name = required.take("name", input.name);
        required.check()?;

        Ok(Self {
            id,
            name,
            code: input.code.unwrap_or_default(),
            instructor: input.instructor.unwrap_or_default(),
            schedule: input.schedule.unwrap_or_default(),
        })
    }

    fn apply(&mut self, patch: ClassPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.code, patch.code);
        merge(&mut self.instructor, patch.instructor);
        merge(&mut self.schedule, patch.schedule);
    }
}

// ========== Exams ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    /// Id of the class this exam belongs to. Not checked against the
    /// classes collection and may dangle after the class is deleted.
    pub class_id: String,
    /// Kind of exam (e.g., "Midterm", "Quiz")
    #[serde(rename = "type")]
    pub exam_type: String,
    /// Exam date in YYYY-MM-DD format
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    pub class_id: Option<String>,
    #[serde(rename = "type")]
    pub exam_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamPatch {
    #[serde(default, deserialize_with = "explicit")]
    pub class_id: Option<Option<String>>,
    #[serde(default, rename = "type", deserialize_with = "explicit")]
    pub exam_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub date: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub time: Option<Option<String>>,
    #[serde(default, deserialize_with = "explicit")]
    pub location: Option<Option<String>>,
}

impl Entity for Exam {
    const COLLECTION: Collection = Collection::Exams;
    const NAME: &'static str = "Exam";

    type New = NewExam;
    type Patch = ExamPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(id: String, input: NewExam) -> Result<Self, AppError> {
        let mut required = Required::default();
        let class_id = required.take("classId", input.class_id);
        let exam_type = required.take("type", input.exam_type);
        let date = required.take("date", input.date);
        required.check()?;

        Ok(Self {
            id,
            class_id,
            exam_type,
            date,
            time: input.time.unwrap_or_default(),
            location: input.location.unwrap_or_default(),
        })
    }

    fn apply(&mut self, patch: ExamPatch) {
        merge(&mut self.class_id, patch.class_id);
        merge(&mut self.exam_type, patch.exam_type);
        merge(&mut self.date, patch.date);
        merge(&mut self.time, patch.time);
        merge(&mut self.location, patch.location);
    }
}
