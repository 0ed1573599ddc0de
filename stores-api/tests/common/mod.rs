use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use auth::Claims;
use auth::JwtHandler;
use axum::extract::State;
use axum::routing::post;
use axum::Form;
use axum::Router;
use serde_json::json;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use stores_api::config::AdminConfig;
use stores_api::config::Config;
use stores_api::config::DatabaseConfig;
use stores_api::config::JwtConfig;
use stores_api::config::MailConfig;
use stores_api::config::ServerConfig;
use stores_api::inbound::http::router::create_router;
use stores_api::inbound::http::router::AppState;

pub const JWT_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";

/// Form fields of one message posted to the stub mail provider.
pub type CapturedMail = HashMap<String, String>;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub pool: SqlitePool,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub outbox: Arc<Mutex<Vec<CapturedMail>>>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let outbox = Arc::new(Mutex::new(Vec::new()));
        let mail_base_url = spawn_mail_provider(Arc::clone(&outbox)).await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let config = Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            server: ServerConfig { http_port: port },
            jwt: JwtConfig {
                secret: JWT_SECRET.to_string(),
                access_token_expiration_minutes: 15,
                refresh_token_expiration_days: 30,
            },
            mail: MailConfig {
                base_url: mail_base_url,
                domain: "mg.example.com".to_string(),
                api_key: "test-key".to_string(),
                from_email: "noreply@example.com".to_string(),
                timeout_secs: 2,
            },
            admin: AdminConfig {
                usernames: vec![ADMIN_USERNAME.to_string()],
            },
        };

        let pool = memory_pool(&config.database.url).await;
        let router = create_router(AppState::new(pool.clone(), &config));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            pool,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET.as_bytes()),
            outbox,
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.put(format!("{}{}", self.address, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.delete(format!("{}{}", self.address, path))
    }

    /// Register a user and return its id.
    pub async fn register(&self, username: &str) -> i64 {
        let response = self
            .post("/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": "pass_word!"
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing user id")
    }

    /// Log in and return (access_token, refresh_token).
    pub async fn login(&self, username: &str) -> (String, String) {
        let response = self
            .post("/login")
            .json(&json!({ "username": username, "password": "pass_word!" }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["access_token"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    /// Register and log in a user, returning its fresh access token.
    pub async fn fresh_token(&self, username: &str) -> String {
        self.register(username).await;
        self.login(username).await.0
    }

    /// Create a store and return its id.
    pub async fn create_store(&self, name: &str) -> i64 {
        let response = self
            .post("/store")
            .json(&json!({ "name": name }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing store id")
    }

    /// Create an item through the open PUT route and return its id.
    pub async fn create_item(&self, name: &str, store_id: i64) -> i64 {
        let response = self
            .put("/item/1000")
            .json(&json!({ "name": name, "price": 9.99, "store_id": store_id }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_i64().expect("Missing item id")
    }

    /// Sign a token with the server secret but an expiry in the past.
    pub fn expired_access_token(&self, user_id: i64) -> String {
        let past = chrono::Utc::now().timestamp() - 60;
        let claims = Claims::access(user_id, false, true, chrono::Duration::minutes(15))
            .with_expiration(past);
        self.jwt_handler.encode(&claims).expect("Failed to sign token")
    }

    /// Wait for the stub provider to receive `count` messages.
    pub async fn wait_for_mail(&self, count: usize) -> Vec<CapturedMail> {
        for _ in 0..100 {
            {
                let outbox = self.outbox.lock().unwrap();
                if outbox.len() >= count {
                    return outbox.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("Expected {} mail(s), none arrived in time", count);
    }
}

/// One shared in-memory connection that lives as long as the pool.
async fn memory_pool(url: &str) -> SqlitePool {
    let options = SqliteConnectOptions::from_str(url)
        .expect("Failed to parse database url")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Stand-in for the Mailgun messages endpoint; records every form it receives.
async fn spawn_mail_provider(outbox: Arc<Mutex<Vec<CapturedMail>>>) -> String {
    async fn accept(
        State(outbox): State<Arc<Mutex<Vec<CapturedMail>>>>,
        Form(fields): Form<CapturedMail>,
    ) -> &'static str {
        outbox.lock().unwrap().push(fields);
        "{\"message\": \"Queued. Thank you.\"}"
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mail provider port");
    let port = listener.local_addr().unwrap().port();

    let router = Router::new()
        .route("/:domain/messages", post(accept))
        .with_state(outbox);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Mail provider error");
    });

    format!("http://127.0.0.1:{}", port)
}
