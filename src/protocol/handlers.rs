//! Route handlers
//!
//! Each handler resolves its path arguments through the storage root, calls
//! one storage, navigate, content or transfer operation and turns the result
//! into a page, a redirect or a JSON body.

use axum::Json;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::{Extension, Form, Multipart, Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::UserClaims;
use crate::content::{read_for_edit, render_file};
use crate::error::{AppError, AuthError, JsonError, StorageError};
use crate::middleware::SESSION_COOKIE;
use crate::navigate::list_folder;
use crate::protocol::requests::{
    CreateFileForm, CreateFolderForm, CreateSemesterForm, EditForm, SessionLoginRequest,
};
use crate::protocol::responses::{ActionResponse, LoginError, LoginResponse};
use crate::protocol::views::{self, encode_path, folder_url};
use crate::server::AppState;
use crate::storage::{self, filesystem};
use crate::transfer::{read_raw, store_uploads};

// --------------------
// Public routes
// --------------------

pub async fn login_page() -> Html<String> {
    Html(views::login_page())
}

pub async fn signup_page() -> Html<String> {
    Html(views::signup_page())
}

/// Exchanges an identity token for a session cookie.
pub async fn session_login(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    jar: CookieJar,
    Json(request): Json<SessionLoginRequest>,
) -> Response {
    let client_id = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    if !state.login_limiter.lock().await.is_allowed(&client_id) {
        warn!("Login rate limit hit for {}", client_id);
        return login_failure(StatusCode::TOO_MANY_REQUESTS, AuthError::RateLimited);
    }

    match state
        .gate
        .create_session(&request.id_token, state.session_ttl)
        .await
    {
        Ok(token) => {
            state.login_limiter.lock().await.reset(&client_id);
            let max_age = i64::try_from(state.session_ttl.as_secs()).unwrap_or(i64::MAX);
            let cookie = Cookie::build((SESSION_COOKIE, token))
                .path("/")
                .http_only(true)
                .secure(state.secure_cookies)
                .same_site(SameSite::Lax)
                .max_age(cookie::time::Duration::seconds(max_age))
                .build();
            (jar.add(cookie), Json(LoginResponse { status: "success" })).into_response()
        }
        Err(e) => {
            warn!("Error creating session cookie for {}: {}", client_id, e);
            login_failure(StatusCode::UNAUTHORIZED, e)
        }
    }
}

fn login_failure(status: StatusCode, error: AuthError) -> Response {
    let body = LoginError {
        error: "Unauthorized request",
        code: error.code(),
    };
    (status, Json(body)).into_response()
}

/// Revokes the session and clears the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.gate.revoke_session(cookie.value()).await;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    (jar, Redirect::to("/login"))
}

// --------------------
// Browsing
// --------------------

pub async fn show_root(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
) -> Result<Response, AppError> {
    show_listing(&state, &user, "").await
}

pub async fn show_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    show_listing(&state, &user, &path).await
}

async fn show_listing(state: &AppState, user: &UserClaims, relative: &str) -> Result<Response, AppError> {
    let resolved = state.root.resolve(relative)?;
    if filesystem::file_exists(&resolved).await {
        return Ok(Redirect::to(&format!("/file/{}", encode_path(relative.trim_matches('/')))).into_response());
    }

    let listing = list_folder(&state.root, relative).await?;
    Ok(Html(views::index_page(&listing, user)).into_response())
}

pub async fn show_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    match render_file(&state.root, &path).await {
        Ok(view) => {
            debug!("Rendering {} from {}", view.relative_path, view.full_path.display());
            Ok(Html(views::file_page(&view)).into_response())
        }
        Err(StorageError::IsADirectory(relative)) => Ok(Redirect::to(&folder_url(&relative)).into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Serves a document's raw bytes for embedding and download.
pub async fn raw_file(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let raw = read_raw(&state.root, &path).await?;
    let mut response = raw.bytes.into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(raw.content_type));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    Ok(response)
}

pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    match read_for_edit(&state.root, &path).await {
        Ok(content) => Ok(Html(views::edit_page(path.trim_matches('/'), &content)).into_response()),
        Err(StorageError::IsADirectory(relative)) => Ok(Redirect::to(&folder_url(&relative)).into_response()),
        Err(e) => Err(e.into()),
    }
}

pub async fn settings(Extension(user): Extension<UserClaims>) -> Html<String> {
    Html(views::settings_page(&user))
}

// --------------------
// Mutations
// --------------------

/// Renames an entry and, when the edit form sent content, rewrites it.
pub async fn edit_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let result = storage::rename_entry(
        &state.root,
        &form.previous_path,
        &form.previous,
        &form.new,
        form.details.as_deref(),
    )
    .await?;

    info!(
        "{} edited {} (renamed: {}, rewritten: {})",
        user.username, result.relative_path, result.renamed, result.rewritten
    );
    Ok(Redirect::to(&folder_url(&result.parent)))
}

pub async fn create_document(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Form(form): Form<CreateFileForm>,
) -> Result<Redirect, AppError> {
    let created = storage::create_file(&state.root, form.folder(), &form.title, &form.details).await?;
    info!("{} created {}", user.username, created.relative_path);
    Ok(Redirect::to(&folder_url(&created.parent)))
}

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Form(form): Form<CreateFolderForm>,
) -> Result<Redirect, AppError> {
    let created = storage::create_folder(&state.root, &form.current_folder, &form.folder_name).await?;
    info!("{} created folder {}", user.username, created.relative_path);
    Ok(Redirect::to(&folder_url(&created.parent)))
}

pub async fn create_semester(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Form(form): Form<CreateSemesterForm>,
) -> Result<Redirect, AppError> {
    let created = storage::create_semester(&state.root, &form.semester_name).await?;
    info!("{} created semester {}", user.username, created.relative_path);
    Ok(Redirect::to("/"))
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<UserClaims>,
    Path(path): Path<String>,
) -> Result<Json<ActionResponse>, JsonError> {
    let deleted = storage::delete_entry(&state.root, &path).await?;
    info!("{} deleted {}", user.username, deleted.relative_path);

    let message = if deleted.was_directory {
        "Folder deleted successfully"
    } else {
        "File deleted successfully"
    };
    Ok(Json(ActionResponse::ok(message)))
}

pub async fn upload_root(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, JsonError> {
    upload_into(&state, "", multipart).await
}

pub async fn upload_nested(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, JsonError> {
    upload_into(&state, &path, multipart).await
}

async fn upload_into(
    state: &AppState,
    destination: &str,
    multipart: Multipart,
) -> Result<Json<ActionResponse>, JsonError> {
    let uploaded = store_uploads(&state.root, destination, multipart, state.upload_limits).await?;
    Ok(Json(
        ActionResponse::ok("Files uploaded successfully").with_files(uploaded.files),
    ))
}
