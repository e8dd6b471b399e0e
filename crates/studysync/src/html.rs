use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::dashboard::{ActiveTodo, DashboardSummary, UpcomingExam};

pub fn render_page(summary: &DashboardSummary) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "StudySync" }
                style { (PreEscaped(CSS)) }
            }
            body {
                div.container {
                    h1 { "StudySync" }
                    div.stats {
                        (render_stat("stat-groups", summary.group_count, "Study groups"))
                        (render_stat("stat-todos", summary.active_todo_count, "Active to-dos"))
                        (render_stat("stat-classes", summary.class_count, "Classes"))
                        (render_stat("stat-exams", summary.upcoming_exam_count, "Upcoming exams"))
                    }
                    section #"dashboard-exams" {
                        h2 { "Upcoming exams" }
                        @if summary.upcoming_exams.is_empty() {
                            p.empty-state { "No upcoming exams" }
                        } @else {
                            @for item in &summary.upcoming_exams {
                                (render_exam(item))
                            }
                        }
                    }
                    section #"dashboard-todos" {
                        h2 { "Active to-dos" }
                        @if summary.active_todos.is_empty() {
                            p.empty-state { "No active to-dos" }
                        } @else {
                            @for item in &summary.active_todos {
                                (render_todo(item))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn render_stat(id: &str, value: usize, caption: &str) -> Markup {
    html! {
        div.stat {
            span class="stat-value" id=(id) { (value) }
            span.stat-caption { (caption) }
        }
    }
}

fn render_exam(item: &UpcomingExam) -> Markup {
    html! {
        div.card {
            div {
                strong { (item.class_name) }
                " - " (item.exam.exam_type)
                br;
                small.muted {
                    (item.exam.date)
                    @if !item.exam.time.is_empty() {
                        " at " (item.exam.time)
                    }
                }
            }
            span class={"badge badge-" (item.color)} { (item.label) }
        }
    }
}

fn render_todo(item: &ActiveTodo) -> Markup {
    let todo = &item.todo;
    html! {
        div.card {
            div {
                strong { (todo.title) }
                @if let Some(due) = &todo.due_date {
                    br;
                    small.muted {
                        @match item.due_status {
                            Some(status) => {
                                span class={"badge badge-" (status.color())} { (due) }
                            }
                            None => { (due) }
                        }
                    }
                }
            }
            @if let Some(assignee) = &todo.assigned_to {
                span.badge.badge-primary { (assignee) }
            }
        }
    }
}

const CSS: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
    background: #f5f6fa;
    color: #1f2330;
    line-height: 1.4;
}

.container {
    max-width: 900px;
    margin: 0 auto;
    padding: 40px 24px 60px;
}

h1 {
    font-size: 2.4em;
    font-weight: 800;
    margin-bottom: 24px;
}

h2 {
    font-size: 1.2em;
    margin: 32px 0 12px;
}

.stats {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 16px;
}

.stat, .card {
    background: #fff;
    border: 1px solid #e3e5ee;
    border-radius: 8px;
    padding: 16px;
}

.stat-value {
    display: block;
    font-size: 2em;
    font-weight: 700;
}

.stat-caption, .muted, .empty-state {
    color: #6b7083;
    font-size: 0.9em;
}

.card {
    display: flex;
    justify-content: space-between;
    align-items: center;
    margin-bottom: 12px;
}

.badge {
    display: inline-block;
    padding: 2px 10px;
    border-radius: 999px;
    font-size: 0.8em;
    font-weight: 600;
}

.badge-gray { background: #e3e5ee; color: #4a4f63; }
.badge-danger { background: #fde2e1; color: #b42318; }
.badge-warning { background: #fef0c7; color: #93370d; }
.badge-success { background: #d1fadf; color: #05603a; }
.badge-primary { background: #dbe6ff; color: #1d3fa6; }
"#;
