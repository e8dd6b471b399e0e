//! Dashboard summary: counters plus the next exams and open to-dos

use chrono::NaiveDate;
use serde::Serialize;

use crate::classify::{self, DueDateStatus, ExamStatus};
use crate::error::AppError;
use crate::repository::Repository;
use crate::store::RecordStore;
use crate::types::{ClassEntity, Exam, StudyGroup, Todo};

/// Maximum number of exams and to-dos listed on the dashboard
pub const DASHBOARD_LIMIT: usize = 5;

/// Shown in place of a class name when an exam points at a missing class
pub const UNKNOWN_CLASS: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingExam {
    pub exam: Exam,
    pub class_name: String,
    pub status: ExamStatus,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveTodo {
    pub todo: Todo,
    pub due_status: Option<DueDateStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub group_count: usize,
    pub class_count: usize,
    pub active_todo_count: usize,
    pub upcoming_exam_count: usize,
    pub upcoming_exams: Vec<UpcomingExam>,
    pub active_todos: Vec<ActiveTodo>,
}

/// Name of the class with `class_id`, or the placeholder when it is gone
pub fn class_name<'a>(classes: &'a [ClassEntity], class_id: &str) -> &'a str {
    classes
        .iter()
        .find(|class| class.id == class_id)
        .map(|class| class.name.as_str())
        .unwrap_or(UNKNOWN_CLASS)
}

impl DashboardSummary {
    pub fn compute(
        groups: &[StudyGroup],
        todos: &[Todo],
        classes: &[ClassEntity],
        exams: &[Exam],
        today: NaiveDate,
    ) -> Self {
        // Exams dated today or later, in stored order. Unparsable dates never count.
        let upcoming: Vec<(&Exam, NaiveDate)> = exams
            .iter()
            .filter_map(|exam| classify::parse_date(&exam.date).map(|date| (exam, date)))
            .filter(|(_, date)| *date >= today)
            .collect();

        let upcoming_exams = upcoming
            .iter()
            .take(DASHBOARD_LIMIT)
            .map(|(exam, date)| {
                let status = classify::exam_status(*date, today);
                UpcomingExam {
                    exam: (*exam).clone(),
                    class_name: class_name(classes, &exam.class_id).to_string(),
                    status,
                    label: status.label(),
                    color: status.color(),
                }
            })
            .collect();

        let open: Vec<&Todo> = todos.iter().filter(|todo| !todo.completed).collect();
        let active_todos = open
            .iter()
            .take(DASHBOARD_LIMIT)
            .map(|todo| ActiveTodo {
                todo: (*todo).clone(),
                due_status: classify::due_date_badge(todo.due_date.as_deref(), today),
            })
            .collect();

        Self {
            group_count: groups.len(),
            class_count: classes.len(),
            active_todo_count: open.len(),
            upcoming_exam_count: upcoming.len(),
            upcoming_exams,
            active_todos,
        }
    }

    /// Read all four collections and summarize them
    pub fn load(store: &RecordStore, today: NaiveDate) -> Result<Self, AppError> {
        let groups = Repository::<StudyGroup>::new(store.clone()).list()?;
        let todos = Repository::<Todo>::new(store.clone()).list()?;
        let classes = Repository::<ClassEntity>::new(store.clone()).list()?;
        let exams = Repository::<Exam>::new(store.clone()).list()?;

        Ok(Self::compute(&groups, &todos, &classes, &exams, today))
    }
}
