//! Request handlers and routes.
//!
//! - `GET|POST /register` - create an account
//! - `GET|POST /login` - authenticate, establish a session
//! - `GET|POST /logout` - destroy the session
//! - `GET /` - the owner's todos, grouped by date
//! - `GET|POST /add` - create a todo
//! - `GET /todo/{id}` - one todo, owner only
//! - `GET|POST /update/{id}` - edit a todo, owner only
//! - `POST /delete/{id}` - delete a todo, owner only
//!
//! Item routes fetch by id first (missing id is a hard 404), then apply the
//! ownership guard (a foreign id redirects to the list with a notice).

use askama::Template;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::auth::{self, CurrentUser, LoginError, RegisterError};
use crate::error::AppError;
use crate::models::todo::{unique_dates, Todo, TodoFields};
use crate::notices::{self, Notice};
use crate::AppState;

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

#[derive(Template)]
#[template(path = "register.html")]
struct RegisterTemplate {
    notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    username: String,
    notices: Vec<Notice>,
    todos: Vec<Todo>,
    unique_dates: Vec<String>,
}

#[derive(Template)]
#[template(path = "add_todo.html")]
struct AddTodoTemplate {
    notices: Vec<Notice>,
}

#[derive(Template)]
#[template(path = "view_todo.html")]
struct ViewTodoTemplate {
    notices: Vec<Notice>,
    todo: Todo,
}

#[derive(Template)]
#[template(path = "update_todo.html")]
struct UpdateTodoTemplate {
    notices: Vec<Notice>,
    todo: Todo,
}

struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => {
                tracing::error!(error = %err, "template rendering failed");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RegisterForm {
    username: String,
    password: String,
    confirm_password: String,
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

// ---------------------------------------------------------------------------
// Account handlers
// ---------------------------------------------------------------------------

async fn register_form(session: Session) -> Result<Response, AppError> {
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(RegisterTemplate { notices }).into_response())
}

async fn register_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    match auth::register(
        &state.pool,
        &form.username,
        &form.password,
        &form.confirm_password,
    )
    .await
    {
        Ok(user) => {
            tracing::info!(username = %user.username, "account created");
            let redirect = notices::redirect_with(
                &session,
                "/login",
                vec![Notice::success("Registration successful, please log in!")],
            )
            .await?;
            Ok(redirect.into_response())
        }
        Err(RegisterError::PasswordMismatch) => {
            let redirect = notices::redirect_with(
                &session,
                "/register",
                vec![Notice::error(
                    "Password and confirmation do not match, please try again.",
                )],
            )
            .await?;
            Ok(redirect.into_response())
        }
        Err(RegisterError::UsernameTaken) => {
            let redirect = notices::redirect_with(
                &session,
                "/register",
                vec![Notice::error(
                    "That username is already taken, please choose another.",
                )],
            )
            .await?;
            Ok(redirect.into_response())
        }
        Err(RegisterError::Internal(err)) => Err(err),
    }
}

async fn login_form(session: Session) -> Result<Response, AppError> {
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(LoginTemplate { notices }).into_response())
}

async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match auth::login(&state.pool, &form.username, &form.password).await {
        Ok(user) => {
            auth::session::establish(&session, &user).await?;
            tracing::debug!(user_id = user.id, "session established");
            Ok(Redirect::to("/").into_response())
        }
        Err(LoginError::InvalidCredentials) => {
            let redirect = notices::redirect_with(
                &session,
                "/login",
                vec![Notice::error(
                    "Unknown account or wrong password, please try again.",
                )],
            )
            .await?;
            Ok(redirect.into_response())
        }
        Err(LoginError::Internal(err)) => Err(err),
    }
}

async fn logout(_user: CurrentUser, session: Session) -> Result<Redirect, AppError> {
    auth::session::clear(&session).await?;
    Ok(Redirect::to("/login"))
}

// ---------------------------------------------------------------------------
// Todo handlers
// ---------------------------------------------------------------------------

async fn index(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
) -> Result<Response, AppError> {
    let todos = Todo::list_by_owner(&state.pool, user.id).await?;
    let dates = unique_dates(&todos);
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(IndexTemplate {
        username: user.username,
        notices,
        todos,
        unique_dates: dates,
    })
    .into_response())
}

async fn add_form(_user: CurrentUser, session: Session) -> Result<Response, AppError> {
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(AddTodoTemplate { notices }).into_response())
}

async fn add_submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Form(fields): Form<TodoFields>,
) -> Result<Redirect, AppError> {
    let todo = Todo::create(&state.pool, user.id, &fields).await?;
    tracing::debug!(todo_id = todo.id, owner_id = user.id, "todo created");
    Ok(Redirect::to("/"))
}

async fn view_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let todo = Todo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if auth::require_owner(&todo, &user).is_err() {
        let redirect = notices::redirect_with(
            &session,
            "/",
            vec![Notice::error("You do not have permission to view this item.")],
        )
        .await?;
        return Ok(redirect.into_response());
    }
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(ViewTodoTemplate { notices, todo }).into_response())
}

async fn update_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let todo = Todo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if auth::require_owner(&todo, &user).is_err() {
        let redirect = notices::redirect_with(
            &session,
            "/",
            vec![Notice::error("You do not have permission to edit this item.")],
        )
        .await?;
        return Ok(redirect.into_response());
    }
    let notices = notices::take(&session).await?;
    Ok(HtmlTemplate(UpdateTodoTemplate { notices, todo }).into_response())
}

async fn update_submit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Path(id): Path<i64>,
    Form(fields): Form<TodoFields>,
) -> Result<Response, AppError> {
    let todo = Todo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if auth::require_owner(&todo, &user).is_err() {
        let redirect = notices::redirect_with(
            &session,
            "/",
            vec![Notice::error("You do not have permission to edit this item.")],
        )
        .await?;
        return Ok(redirect.into_response());
    }
    Todo::update(&state.pool, todo.id, &fields).await?;
    tracing::debug!(todo_id = todo.id, "todo updated");
    Ok(Redirect::to("/").into_response())
}

async fn delete_todo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    session: Session,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let todo = Todo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::NotFound)?;
    if auth::require_owner(&todo, &user).is_err() {
        let redirect = notices::redirect_with(
            &session,
            "/",
            vec![Notice::error("You do not have permission to delete this item.")],
        )
        .await?;
        return Ok(redirect.into_response());
    }
    Todo::delete(&state.pool, todo.id).await?;
    tracing::debug!(todo_id = todo.id, "todo deleted");
    Ok(Redirect::to("/").into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_form).post(register_submit))
        .route("/login", get(login_form).post(login_submit))
        .route("/logout", get(logout).post(logout))
        .route("/", get(index))
        .route("/add", get(add_form).post(add_submit))
        .route("/todo/{id}", get(view_todo))
        .route("/update/{id}", get(update_form).post(update_submit))
        .route("/delete/{id}", post(delete_todo))
}
