use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeFile, trace::TraceLayer};

use crate::{
    AppState,
    middleware::{handle_panic, log_errors, require_session},
    routes::{auth, pages, submission},
};

// 图片上限之外给其余表单字段留出余量
const API_BODY_LIMIT: usize = submission::MAX_IMAGE_BYTES + 1024 * 1024;

/// 创建主路由
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    // 公开路由
    let public_routes: Router<AppState> = Router::new()
        .route("/", get(pages::root))
        .route("/login", get(pages::login_page))
        .route("/index.html", get(pages::redirect_to_root))
        .route("/loading.html", get(pages::redirect_to_root))
        .route("/auth/check", get(auth::check))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout));

    // 需要会话的页面和静态资源，只开放这几个文件
    let protected_pages: Router<AppState> = Router::new()
        .route_service("/form", ServeFile::new(static_dir.join(pages::FORM_PAGE)))
        .route_service("/script.js", ServeFile::new(static_dir.join("script.js")))
        .route_service("/style.css", ServeFile::new(static_dir.join("style.css")))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    // API 整体受保护，包括未匹配的路径
    let api_routes: Router<AppState> = Router::new()
        .route("/append-to-sheet", post(submission::append_to_sheet))
        .fallback(submission::api_not_found)
        .layer(DefaultBodyLimit::max(API_BODY_LIMIT))
        .layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_pages)
        .nest("/api", api_routes)
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
