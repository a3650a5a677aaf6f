use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{middleware, Router};
use tracing::{debug, warn};

use mcpe_store::{StoreHandle, StoreOpener};
use mcpe_world::codec::escape_segment;
use mcpe_world::{describe, fill_collection, list_worlds, WorldRecord, WorldsResponse};

use crate::config::ApiConfig;
use crate::cors::cors_middleware;
use crate::db::DbHandler;
use crate::error::{ApiError, ApiResult};
use crate::level::LevelHandler;
use crate::route::{decompose, Route, SubResourceKind, Target};
use crate::subresource::{json_response, SubResourceHandler};

/// Shared state of the worlds router.
#[derive(Clone)]
pub struct ApiState {
    mount: String,
    worlds_root: PathBuf,
    probe_worlds: bool,
    opener: Arc<dyn StoreOpener>,
    db: Arc<dyn SubResourceHandler>,
    level: Arc<dyn SubResourceHandler>,
}

impl ApiState {
    pub fn new(config: &ApiConfig, opener: Arc<dyn StoreOpener>) -> Self {
        Self {
            mount: config.mount_prefix(),
            worlds_root: config.worlds_root(),
            probe_worlds: config.probe_worlds,
            opener,
            db: Arc::new(DbHandler),
            level: Arc::new(LevelHandler),
        }
    }

    pub fn with_db_handler(mut self, handler: Arc<dyn SubResourceHandler>) -> Self {
        self.db = handler;
        self
    }

    pub fn with_level_handler(mut self, handler: Arc<dyn SubResourceHandler>) -> Self {
        self.level = handler;
        self
    }

    pub fn mount(&self) -> &str {
        &self.mount
    }
}

/// Build the axum router serving the worlds API under the configured mount.
pub fn build_router(state: ApiState) -> Router {
    let mount = state.mount.clone();
    Router::new()
        .route(&mount, any(worlds_handler))
        .route(&format!("{mount}*rest"), any(worlds_handler))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn worlds_handler(State(state): State<ApiState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match dispatch(&state, request).await {
        Ok(response) => response,
        Err(e) => {
            debug!(%method, %path, status = %e.status(), error = %e, "request failed");
            e.into_response()
        }
    }
}

async fn dispatch(state: &ApiState, request: Request) -> ApiResult<Response> {
    let route = decompose(request.uri().path(), &state.mount)?;
    debug!(?route, "routing request");

    let (dir_name, target) = match route {
        Route::Collection => {
            ensure_get(request.method())?;
            let worlds = collection(state).await?;
            return json_response(&WorldsResponse::collection(worlds));
        }
        Route::World { dir_name, target } => (dir_name, target),
    };

    let (world, store) = resolve_world(state, dir_name).await?;
    let store = Arc::new(store);

    let result = match target {
        Target::Item => {
            ensure_get(request.method()).and_then(|()| json_response(&WorldsResponse::item(world)))
        }
        Target::SubResource { kind: SubResourceKind::Db, remainder } => {
            let store = Arc::clone(&store);
            state.db.handle(store, &world.db_url, &remainder, request).await
        }
        Target::SubResource { kind: SubResourceKind::Level, remainder } => {
            let store = Arc::clone(&store);
            state.level.handle(store, &world.level_url, &remainder, request).await
        }
        Target::Unrecognized(_) => Err(ApiError::EndpointNotFound),
    };

    release_store(store).await;
    result
}

fn ensure_get(method: &Method) -> ApiResult<()> {
    if method == Method::GET {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed(method.to_string()))
    }
}

/// Describe the world and open its store, off the async workers.
async fn resolve_world(
    state: &ApiState,
    dir_name: String,
) -> ApiResult<(WorldRecord, StoreHandle)> {
    let world_path = state.worlds_root.join(&dir_name);
    let url_prefix = format!("{}{}", state.mount, escape_segment(&dir_name));
    let opener = Arc::clone(&state.opener);
    tokio::task::spawn_blocking(move || -> ApiResult<(WorldRecord, StoreHandle)> {
        let world = describe(&world_path, &url_prefix);
        let store = opener.open(&world_path).map_err(ApiError::OpenWorld)?;
        Ok((world, store))
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Close the request's store on the blocking pool. Release failures are
/// logged; the response is already decided.
async fn release_store(store: Arc<StoreHandle>) {
    let released = tokio::task::spawn_blocking(move || match Arc::try_unwrap(store) {
        Ok(store) => store.close(),
        Err(shared) => {
            warn!(path = %shared.path().display(), "world store still shared after request");
            Ok(())
        }
    })
    .await;
    match released {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "failed to release world store"),
        Err(e) => warn!(error = %e, "world store release task failed"),
    }
}

async fn collection(state: &ApiState) -> ApiResult<Vec<WorldRecord>> {
    let root = state.worlds_root.clone();
    let mount = state.mount.clone();
    let opener = state.probe_worlds.then(|| Arc::clone(&state.opener));

    tokio::task::spawn_blocking(move || -> ApiResult<Vec<WorldRecord>> {
        let names = list_worlds(&root)?;
        let worlds = fill_collection(&root, &mount, &names);
        Ok(match opener {
            Some(opener) => worlds
                .into_iter()
                .map(|world| probe_world(opener.as_ref(), &root, world))
                .collect(),
            None => worlds,
        })
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
}

fn probe_world(opener: &dyn StoreOpener, root: &Path, world: WorldRecord) -> WorldRecord {
    match opener.open(&root.join(&world.dir_name)) {
        Ok(store) => match store.close() {
            Ok(()) => world,
            Err(e) => world.with_error(format!("Closing world: {e}")),
        },
        Err(e) => world.with_error(format!("Opening world: {e}")),
    }
}
