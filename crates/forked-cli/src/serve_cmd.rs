use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use forked_core::ShoppingListError;
use forked_core::shopping::{ShoppingListBuilder, ShoppingListRequest};
use forked_core::store::{PgStore, RecipeStore, ShoppingListStore};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{err:#}"), "request failed");
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("{err:#}"),
        }
    }
}

impl From<ShoppingListError> for AppError {
    fn from(err: ShoppingListError) -> Self {
        let status = match &err {
            ShoppingListError::Validation(_) => StatusCode::BAD_REQUEST,
            ShoppingListError::NotFound { .. } => StatusCode::NOT_FOUND,
            ShoppingListError::StoreUnavailable(_) => {
                tracing::warn!(error = %err, "recipe store unavailable");
                StatusCode::SERVICE_UNAVAILABLE
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// State and request types
// ---------------------------------------------------------------------------

/// Store handles shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeStore>,
    pub lists: Arc<dyn ShoppingListStore>,
}

impl AppState {
    pub fn new(recipes: Arc<dyn RecipeStore>, lists: Arc<dyn ShoppingListStore>) -> Self {
        Self { recipes, lists }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }
}

#[derive(Debug, Deserialize)]
pub struct ShoppingListQuery {
    #[serde(default)]
    pub ricette: String,
    #[serde(default)]
    pub persone: String,
}

#[derive(Debug, Deserialize)]
pub struct ShoppingListBody {
    #[serde(default)]
    pub ricette: Vec<String>,
    #[serde(default)]
    pub persone: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/forked/recipes", get(list_recipes))
        .route("/forked/recipes/by-id/{id}", get(get_recipe))
        .route(
            "/forked/lista-spesa",
            get(preview_shopping_list).post(create_shopping_list),
        )
        .route("/forked/liste-spesa", get(list_saved_lists))
        .route("/forked/liste-spesa/{id}", get(get_saved_list))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(state: AppState, bind: &str, port: u16) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("forked serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("forked serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C; shutting down");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Forked API is running",
        "docs": "Use /forked/... to access the API",
    }))
}

async fn list_recipes(State(state): State<AppState>) -> Result<axum::response::Response, AppError> {
    let recipes = state
        .recipes
        .list_recipes()
        .await
        .map_err(AppError::internal)?;
    Ok(Json(recipes).into_response())
}

async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let recipe = state
        .recipes
        .get_recipe(&id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("recipe {id} not found")))?;
    Ok(Json(recipe).into_response())
}

/// Compute a list from query parameters without saving it.
async fn preview_shopping_list(
    State(state): State<AppState>,
    Query(query): Query<ShoppingListQuery>,
) -> Result<axum::response::Response, AppError> {
    let request = ShoppingListRequest::from_query(&query.ricette, &query.persone)?;
    let result = ShoppingListBuilder::new(state.recipes.as_ref())
        .build(&request)
        .await?;
    Ok(Json(result).into_response())
}

/// Compute a list from a JSON body and append it to the list store.
async fn create_shopping_list(
    State(state): State<AppState>,
    body: Result<Json<ShoppingListBody>, JsonRejection>,
) -> Result<axum::response::Response, AppError> {
    let Json(body) = body?;
    let request = ShoppingListRequest::from_json(body.ricette, &body.persone)?;
    let saved = ShoppingListBuilder::new(state.recipes.as_ref())
        .build_and_save(&request, state.lists.as_ref())
        .await?;
    Ok((StatusCode::CREATED, Json(saved)).into_response())
}

async fn list_saved_lists(
    State(state): State<AppState>,
) -> Result<axum::response::Response, AppError> {
    let lists = state.lists.list_lists().await.map_err(AppError::internal)?;
    Ok(Json(lists).into_response())
}

async fn get_saved_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let list = state
        .lists
        .get_list(&id)
        .await
        .map_err(AppError::internal)?
        .ok_or_else(|| AppError::not_found(format!("shopping list {id} not found")))?;
    Ok(Json(list).into_response())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use forked_core::store::{MemoryStore, PgStore, RecipeStore};
    use forked_db::models::Ingredient;
    use forked_db::queries::recipes::NewRecipe;
    use forked_test_utils::{create_test_db, drop_test_db};

    use super::AppState;

    // -----------------------------------------------------------------------
    // HTTP helpers
    // -----------------------------------------------------------------------

    fn memory_state() -> (AppState, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (AppState::new(store.clone(), store.clone()), store)
    }

    async fn seed(store: &dyn RecipeStore, name: &str, ingredients: Vec<Ingredient>) -> String {
        store
            .insert_recipe(&NewRecipe {
                name: name.to_string(),
                ingredients,
                instructions: String::new(),
                image_url: None,
            })
            .await
            .unwrap()
            .id
            .to_string()
    }

    async fn get(state: AppState, uri: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(state: AppState, uri: &str, body: &str) -> axum::response::Response {
        let app = super::build_router(state);
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn test_index_returns_message() {
        let (state, _) = memory_state();
        let resp = get(state, "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert!(json["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_recipes_list_and_detail() {
        let (state, store) = memory_state();
        let id = seed(store.as_ref(), "Carbonara", vec![Ingredient::new("egg", 1.0, "pz")]).await;

        let resp = get(state.clone(), "/forked/recipes").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["name"], "Carbonara");
        assert_eq!(json[0]["_id"], id.as_str());
        assert_eq!(json[0]["ingredients"][0]["nome"], "egg");

        let resp = get(state.clone(), &format!("/forked/recipes/by-id/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["name"], "Carbonara");

        let resp = get(state, "/forked/recipes/by-id/missing").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert!(body_json(resp).await.get("message").is_some());
    }

    #[tokio::test]
    async fn test_preview_shopping_list_from_query() {
        let (state, store) = memory_state();
        let a = seed(store.as_ref(), "A", vec![Ingredient::new("flour", 200.0, "g")]).await;
        let b = seed(
            store.as_ref(),
            "B",
            vec![
                Ingredient::new("flour", 100.0, "g"),
                Ingredient::new("sugar", 50.0, "g"),
            ],
        )
        .await;

        let resp = get(state.clone(), &format!("/forked/lista-spesa?ricette={a},{b}&persone=2")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["persone"], 2);
        assert_eq!(json["ricette"], serde_json::json!(["A", "B"]));
        assert_eq!(
            json["listaSpesa"],
            serde_json::json!([
                { "nome": "flour", "quantita": 600.0, "unita": "g" },
                { "nome": "sugar", "quantita": 100.0, "unita": "g" },
            ])
        );
        assert!(json["createdAt"].is_string());

        // Previews are not persisted.
        let resp = get(state, "/forked/liste-spesa").await;
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_preview_rejects_bad_people() {
        let (state, store) = memory_state();
        let a = seed(store.as_ref(), "A", vec![]).await;

        for persone in ["0", "-3", "2.5", "abc", ""] {
            let resp = get(
                state.clone(),
                &format!("/forked/lista-spesa?ricette={a}&persone={persone}"),
            )
            .await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "persone={persone:?}");
        }

        let resp = get(state, "/forked/lista-spesa?persone=2").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_shopping_list_persists() {
        let (state, store) = memory_state();
        let a = seed(store.as_ref(), "A", vec![Ingredient::new("milk", 1.0, "l")]).await;
        let b = seed(store.as_ref(), "B", vec![Ingredient::new("milk", 500.0, "ml")]).await;

        let body = serde_json::json!({ "ricette": [a, b], "persone": 3 }).to_string();
        let resp = post_json(state.clone(), "/forked/lista-spesa", &body).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["listaSpesa"].as_array().unwrap().len(), 2);
        assert_eq!(json["persone"], 3);
        let id = json["id"].as_str().unwrap().to_string();

        let resp = get(state.clone(), &format!("/forked/liste-spesa/{id}")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["listaSpesa"][1]["quantita"], 1500.0);

        let resp = get(state, "/forked/liste-spesa").await;
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_shopping_list_missing_recipe() {
        let (state, store) = memory_state();
        let a = seed(store.as_ref(), "A", vec![]).await;

        let body = serde_json::json!({ "ricette": [a, "nope"], "persone": 2 }).to_string();
        let resp = post_json(state.clone(), "/forked/lista-spesa", &body).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = get(state, "/forked/liste-spesa").await;
        assert_eq!(body_json(resp).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_create_shopping_list_validation() {
        let (state, store) = memory_state();
        let a = seed(store.as_ref(), "A", vec![]).await;

        let cases = [
            serde_json::json!({ "ricette": [], "persone": 2 }),
            serde_json::json!({ "ricette": [a], "persone": 0 }),
            serde_json::json!({ "ricette": [a], "persone": 1.5 }),
            serde_json::json!({ "ricette": [a] }),
            serde_json::json!({ "persone": 2 }),
            serde_json::json!({ "ricette": "A", "persone": 2 }),
        ];
        for case in cases {
            let resp = post_json(state.clone(), "/forked/lista-spesa", &case.to_string()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {case}");
        }

        let resp = post_json(state, "/forked/lista-spesa", "{not json").await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_saved_list_not_found() {
        let (state, _) = memory_state();
        let resp = get(state, &format!("/forked/liste-spesa/{}", uuid::Uuid::new_v4())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_postgres_backed_router() {
        let (pool, db_name) = create_test_db().await;
        let store = PgStore::new(pool.clone());
        let a = seed(&store, "Risotto", vec![Ingredient::new("rice", 80.0, "g")]).await;
        let state = AppState::postgres(store);

        let body = serde_json::json!({ "ricette": [a], "persone": 4 }).to_string();
        let resp = post_json(state.clone(), "/forked/lista-spesa", &body).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let json = body_json(resp).await;
        assert_eq!(json["listaSpesa"][0]["quantita"], 320.0);

        let resp = get(state, "/forked/recipes").await;
        assert_eq!(body_json(resp).await.as_array().unwrap().len(), 1);

        pool.close().await;
        drop_test_db(&db_name).await;
    }
}
