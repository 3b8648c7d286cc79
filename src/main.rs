use std::net::TcpListener;
use std::sync::Arc;
use todoapp::auth::{SystemClock, TokenAuthority};
use todoapp::configuration::{get_configuration, StorageBackend};
use todoapp::startup::{run, AppState};
use todoapp::store::{InMemoryStore, PgStore, TodoStore, UserStore};
use todoapp::telemetry::init_telemetry;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if let Err(e) = configuration.validate() {
        tracing::error!("Invalid configuration: {}", e);
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Configuration error",
        ));
    }

    let (users, todos): (Arc<dyn UserStore>, Arc<dyn TodoStore>) =
        match configuration.database.backend {
            StorageBackend::Postgres => {
                tracing::info!("Connecting to database");
                let store = PgStore::connect(&configuration.database)
                    .await
                    .map(Arc::new)
                    .map_err(|e| {
                        tracing::error!("Failed to set up database: {}", e);
                        std::io::Error::new(
                            std::io::ErrorKind::ConnectionRefused,
                            "Database connection error",
                        )
                    })?;
                tracing::info!("Database ready");
                let users: Arc<dyn UserStore> = store.clone();
                let todos: Arc<dyn TodoStore> = store;
                (users, todos)
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                let store = Arc::new(InMemoryStore::new());
                let users: Arc<dyn UserStore> = store.clone();
                let todos: Arc<dyn TodoStore> = store;
                (users, todos)
            }
        };

    let authority = Arc::new(TokenAuthority::new(
        &configuration.jwt,
        Arc::new(SystemClock),
    ));

    let state = AppState::new(
        users,
        todos,
        authority,
        configuration.password.clone(),
        configuration.application.static_dir.clone(),
    );

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    run(listener, state)?.await
}
