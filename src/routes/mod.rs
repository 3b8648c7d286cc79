mod admin;
mod auth;
mod health_check;
mod index;
mod todos;
mod users;

pub use admin::{delete_any_todo, list_all_todos};
pub use auth::{create_user, login};
pub use health_check::health_check;
pub use index::{index, StaticDir};
pub use todos::{create_todo, delete_todo, get_todo, list_todos, update_todo};
pub use users::{change_password, change_phone_number, get_user_info};
