use actix_files as fs;
use actix_web::dev::Server;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::TokenAuthority;
use crate::configuration::PasswordSettings;
use crate::error::{AppError, ValidationError};
use crate::middleware::{JwtMiddleware, RequestLogger, SECURITY_HEADERS};
use crate::routes::{
    change_password, change_phone_number, create_todo, create_user, delete_any_todo, delete_todo,
    get_todo, get_user_info, health_check, index, list_all_todos, list_todos, login, update_todo,
    StaticDir,
};
use crate::store::{TodoStore, UserStore};

/// Everything the handlers share, built once in `main` (or a test)
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub authority: Arc<TokenAuthority>,
    pub password: PasswordSettings,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        authority: Arc<TokenAuthority>,
        password: PasswordSettings,
        static_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            users,
            todos,
            authority,
            password,
            static_dir: static_dir.into(),
        }
    }
}

fn security_headers() -> DefaultHeaders {
    SECURITY_HEADERS
        .iter()
        .fold(DefaultHeaders::new(), |headers, &pair| headers.add(pair))
}

fn bad_request(field: &str, err: impl std::fmt::Display) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected malformed request");
    AppError::Validation(ValidationError::InvalidFormat(field.to_string())).into()
}

pub fn run(listener: TcpListener, state: AppState) -> Result<Server, std::io::Error> {
    let users: web::Data<dyn UserStore> = web::Data::from(state.users);
    let todos: web::Data<dyn TodoStore> = web::Data::from(state.todos);
    let authority: web::Data<TokenAuthority> = web::Data::from(state.authority.clone());
    let password = web::Data::new(state.password);
    let static_dir = web::Data::new(StaticDir(state.static_dir));
    let jwt_authority = state.authority;

    let server = HttpServer::new(move || {
        App::new()
            // Global middleware
            .wrap(security_headers())
            .wrap(RequestLogger)

            // Shared state
            .app_data(users.clone())
            .app_data(todos.clone())
            .app_data(authority.clone())
            .app_data(password.clone())
            .app_data(static_dir.clone())

            // Malformed bodies and paths are client errors
            .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request("body", err)))
            .app_data(web::FormConfig::default().error_handler(|err, _| bad_request("form", err)))
            .app_data(web::PathConfig::default().error_handler(|err, _| bad_request("id", err)))

            // Public routes
            .route("/healthy", web::get().to(health_check))
            .route("/", web::get().to(index))
            .service(
                web::scope("/auth")
                    .route("/new-user", web::post().to(create_user))
                    .route("/token", web::post().to(login)),
            )

            // Protected routes
            .service(
                web::scope("/todos")
                    .wrap(JwtMiddleware::new(jwt_authority.clone()))
                    .route("", web::get().to(list_todos))
                    .route("", web::post().to(create_todo))
                    .route("/", web::get().to(list_todos))
                    .route("/", web::post().to(create_todo))
                    .route("/{todo_id}", web::get().to(get_todo))
                    .route("/{todo_id}", web::put().to(update_todo))
                    .route("/{todo_id}", web::delete().to(delete_todo)),
            )
            .service(
                web::scope("/admin")
                    .wrap(JwtMiddleware::new(jwt_authority.clone()))
                    .route("/todos", web::get().to(list_all_todos))
                    .route("/todos/{todo_id}", web::delete().to(delete_any_todo)),
            )
            .service(
                web::scope("/users")
                    .wrap(JwtMiddleware::new(jwt_authority.clone()))
                    .route("/user-info", web::get().to(get_user_info))
                    .route("/change-password", web::post().to(change_password))
                    .route("/change-phone-number", web::post().to(change_phone_number)),
            )

            // Static assets
            .service(fs::Files::new("/static", static_dir.0.clone()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
