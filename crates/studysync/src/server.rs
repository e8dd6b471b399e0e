use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, patch},
    Json, Router,
};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::info;

use crate::classify;
use crate::config::ServerConfig;
use crate::dashboard::DashboardSummary;
use crate::error::{AppError, MessageBody};
use crate::html;
use crate::repository::{Entity, Repository};
use crate::store::RecordStore;
use crate::types::{ClassEntity, Exam, StudyGroup, Todo};

/// Application state shared across requests
pub struct AppState {
    pub store: RecordStore,
}

impl AppState {
    fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.store.clone())
    }
}

/// Initialize the data directory and start the web server
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let store = RecordStore::new(&config.data_dir);
    store.init().with_context(|| {
        format!(
            "Failed to initialize data directory {}",
            config.data_dir.display()
        )
    })?;

    let state = Arc::new(AppState { store });
    let app = router(state).fallback_service(ServeDir::new(&config.public_dir));

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;

    info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        "Server running"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .merge(resource_routes::<StudyGroup>())
        .merge(resource_routes::<Todo>())
        .merge(resource_routes::<ClassEntity>())
        .merge(resource_routes::<Exam>())
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .with_state(state)
}

/// list/get/create/update/delete routes for one entity type
fn resource_routes<E: Entity>() -> Router<Arc<AppState>> {
    let base = format!("/api/{}", E::COLLECTION);
    Router::new()
        .route(&base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{}/{{id}}", base),
            get(get_one::<E>).put(update::<E>).delete(remove::<E>),
        )
}

/// Run store work on the blocking pool; the record store does plain file I/O
async fn blocking<T, F>(state: Arc<AppState>, f: F) -> Result<T, AppError>
where
    F: FnOnce(&AppState) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || f(&state)).await?
}

async fn list<E: Entity>(State(state): State<Arc<AppState>>) -> Result<Json<Vec<E>>, AppError> {
    let records = blocking(state, |state| state.repository::<E>().list()).await?;
    Ok(Json(records))
}

async fn get_one<E: Entity>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<E>, AppError> {
    let record = blocking(state, move |state| state.repository::<E>().get(&id)).await?;
    Ok(Json(record))
}

async fn create<E: Entity>(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<E::New>, JsonRejection>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let Json(input) = payload?;
    let record = blocking(state, move |state| state.repository::<E>().create(input)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn update<E: Entity>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<E::Patch>, JsonRejection>,
) -> Result<Json<E>, AppError> {
    let Json(patch) = payload?;
    let record = blocking(state, move |state| state.repository::<E>().update(&id, patch)).await?;
    Ok(Json(record))
}

async fn remove<E: Entity>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    let message = blocking(state, move |state| state.repository::<E>().delete(&id)).await?;
    Ok(Json(MessageBody::new(message)))
}

async fn toggle_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, AppError> {
    let todo = blocking(state, move |state| {
        state.repository::<Todo>().toggle_complete(&id)
    })
    .await?;
    Ok(Json(todo))
}

async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardSummary>, AppError> {
    let summary = blocking(state, |state| {
        DashboardSummary::load(&state.store, classify::today())
    })
    .await?;
    Ok(Json(summary))
}

/// Serve the overview page
async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let summary = blocking(state, |state| {
        DashboardSummary::load(&state.store, classify::today())
    })
    .await?;
    Ok(Html(html::render_page(&summary).into_string()))
}
