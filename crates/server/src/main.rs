// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::sync::Arc;

use achievement_log_api::{
    ApiError, AuthenticationService, CreateBackupResponse, DeleteStudentResponse, ExportFile,
    ListBackupsResponse, ListClassesResponse, ListStudentsRequest, ListStudentsResponse,
    ListTeachersResponse, LoginRequest, LoginResponse, RestoreBackupRequest, RestoreBackupResponse,
    SimilarStudentsResponse, StudentInfo, StudentRequest, create_backup, create_student,
    delete_student, ensure_initial_admin, export_csv, find_similar_students, get_student,
    list_backups, list_classes, list_students, list_teachers, login, logout, restore_backup,
    update_student,
};
use achievement_log_persistence::Persistence;
use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::SessionAdmin;

/// Achievement Log Server - HTTP server for the student achievement log
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "DATABASE_PATH")]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(long, env = "APP_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to bind the server to
    #[arg(short, long, env = "APP_PORT", default_value_t = 5000)]
    port: u16,

    /// Username of the admin created on first start
    #[arg(long, env = "ADMIN_USERNAME", default_value = "admin")]
    admin_username: String,

    /// Password of the admin created on first start. No admin is created without it.
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// Directory holding database backups
    #[arg(long, env = "BACKUP_DIR", default_value = "backups")]
    backup_dir: PathBuf,

    /// Number of backups kept after each new backup
    #[arg(long, env = "BACKUP_KEEP", default_value_t = 10)]
    backup_keep: usize,

    /// Session lifetime in days (1 to 3650)
    #[arg(
        long,
        env = "SESSION_DAYS",
        default_value_t = AuthenticationService::DEFAULT_SESSION_DAYS,
        value_parser = clap::value_parser!(i64).range(AuthenticationService::SESSION_DAYS_RANGE)
    )]
    session_days: i64,
}

/// Application state shared across handlers.
///
/// Every request goes through the one connection behind the mutex, so
/// writes are serialized.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    backup_dir: Arc<PathBuf>,
    backup_keep: usize,
    session_days: i64,
}

/// Query parameters for the duplicate check.
#[derive(Debug, Deserialize)]
struct SimilarStudentsQuery {
    full_name: String,
    class_name: String,
}

#[derive(Debug, Deserialize)]
struct ExportQuery {
    class: Option<String>,
}

/// API response for logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LogoutResponse {
    message: String,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

impl ErrorResponse {
    const fn new(message: String) -> Self {
        Self {
            error: true,
            message,
        }
    }

    fn into_status_response(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        ErrorResponse::new(self.message).into_status_response(self.status)
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Authentication
// ============================================================================

async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(username = %req.username, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse = login(&mut persistence, &req, app_state.session_days)?;

    Ok(Json(response))
}

async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
) -> Result<Json<LogoutResponse>, HttpError> {
    info!(username = %session.admin.username, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &session.token)?;

    Ok(Json(LogoutResponse {
        message: String::from("Logged out"),
    }))
}

// ============================================================================
// Students
// ============================================================================

async fn handle_list_students(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
    Query(query): Query<ListStudentsRequest>,
) -> Result<Json<ListStudentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: ListStudentsResponse = list_students(&mut persistence, &query)?;

    Ok(Json(response))
}

async fn handle_get_student(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
    Path(student_id): Path<i64>,
) -> Result<Json<StudentInfo>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: StudentInfo = get_student(&mut persistence, student_id)?;

    Ok(Json(response))
}

async fn handle_create_student(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
    Json(req): Json<StudentRequest>,
) -> Result<(StatusCode, Json<StudentInfo>), HttpError> {
    info!(
        username = %session.admin.username,
        full_name = %req.full_name,
        class_name = %req.class_name,
        "Handling create student request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: StudentInfo = create_student(&mut persistence, &session.admin, req)?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn handle_update_student(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
    Path(student_id): Path<i64>,
    Json(req): Json<StudentRequest>,
) -> Result<Json<StudentInfo>, HttpError> {
    info!(
        username = %session.admin.username,
        student_id,
        "Handling update student request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: StudentInfo = update_student(&mut persistence, &session.admin, student_id, req)?;

    Ok(Json(response))
}

async fn handle_delete_student(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
    Path(student_id): Path<i64>,
) -> Result<Json<DeleteStudentResponse>, HttpError> {
    info!(
        username = %session.admin.username,
        student_id,
        "Handling delete student request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteStudentResponse =
        delete_student(&mut persistence, &session.admin, student_id)?;

    Ok(Json(response))
}

async fn handle_similar_students(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
    Query(query): Query<SimilarStudentsQuery>,
) -> Result<Json<SimilarStudentsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: SimilarStudentsResponse =
        find_similar_students(&mut persistence, &query.full_name, &query.class_name)?;

    Ok(Json(response))
}

async fn handle_list_classes(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
) -> Result<Json<ListClassesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_classes(&mut persistence)?))
}

async fn handle_list_teachers(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
) -> Result<Json<ListTeachersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_teachers(&mut persistence)?))
}

// ============================================================================
// Export
// ============================================================================

async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let export: ExportFile = export_csv(&mut persistence, query.class.as_deref())?;

    info!(
        username = %session.admin.username,
        filename = %export.filename,
        rows = export.row_count,
        "Export generated"
    );

    let headers: [(header::HeaderName, String); 2] = [
        (
            header::CONTENT_TYPE,
            String::from("text/csv; charset=utf-8"),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export.filename),
        ),
    ];
    Ok((StatusCode::OK, headers, export.content).into_response())
}

// ============================================================================
// Backups
// ============================================================================

async fn handle_list_backups(
    AxumState(app_state): AxumState<AppState>,
    _session: SessionAdmin,
) -> Result<Json<ListBackupsResponse>, HttpError> {
    Ok(Json(list_backups(&app_state.backup_dir)?))
}

async fn handle_create_backup(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
) -> Result<Json<CreateBackupResponse>, HttpError> {
    info!(username = %session.admin.username, "Handling create backup request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateBackupResponse = create_backup(
        &mut persistence,
        &session.admin,
        &app_state.backup_dir,
        app_state.backup_keep,
    )?;

    Ok(Json(response))
}

async fn handle_restore_backup(
    AxumState(app_state): AxumState<AppState>,
    session: SessionAdmin,
    Json(req): Json<RestoreBackupRequest>,
) -> Result<Json<RestoreBackupResponse>, HttpError> {
    info!(
        username = %session.admin.username,
        filename = %req.filename,
        "Handling restore backup request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RestoreBackupResponse = restore_backup(
        &mut persistence,
        &session.admin,
        &app_state.backup_dir,
        &req,
    )?;

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/login", post(handle_login))
        .route("/logout", post(handle_logout))
        .route(
            "/students",
            get(handle_list_students).post(handle_create_student),
        )
        .route("/students/similar", get(handle_similar_students))
        .route(
            "/students/{student_id}",
            get(handle_get_student)
                .put(handle_update_student)
                .delete(handle_delete_student),
        )
        .route("/classes", get(handle_list_classes))
        .route("/teachers", get(handle_list_teachers))
        .route("/export", get(handle_export))
        .route("/backups", get(handle_list_backups).post(handle_create_backup))
        .route("/backups/restore", post(handle_restore_backup))
        .with_state(app_state)
}

/// Creates the first admin and clears stale sessions.
fn prepare_store(
    persistence: &mut Persistence,
    admin_username: &str,
    admin_password: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let expired: usize = persistence.delete_expired_sessions()?;
    if expired > 0 {
        info!(expired, "Removed expired sessions");
    }

    match admin_password {
        Some(password) => {
            if ensure_initial_admin(persistence, admin_username, password)?.is_none() {
                info!("Admin account already present, skipping bootstrap");
            }
        }
        None if persistence.count_admins()? == 0 => {
            warn!("No admin exists and no admin password was given; login is impossible");
        }
        None => {}
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Achievement Log Server");

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    prepare_store(
        &mut persistence,
        &args.admin_username,
        args.admin_password.as_deref(),
    )?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        backup_dir: Arc::new(args.backup_dir),
        backup_keep: args.backup_keep,
        session_days: args.session_days,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Run server
    let listener = tokio::net::TcpListener::bind((args.host.as_str(), args.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
