use skinlab_api::routes::doc::ApiDoc;
use utoipa::OpenApi;

fn post_statuses(path: &str) -> Vec<String> {
    let doc = ApiDoc::openapi();
    doc.paths
        .paths
        .get(path)
        .and_then(|item| item.post.as_ref())
        .map(|op| op.responses.responses.keys().cloned().collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn stored_analyses_are_documented_as_created() {
    for path in ["/api/analysis", "/api/analysis/save-from-scan"] {
        let statuses = post_statuses(path);
        assert!(statuses.contains(&"201".to_string()), "{path}: {statuses:?}");
        assert!(!statuses.contains(&"200".to_string()), "{path}: {statuses:?}");
    }
}

#[tokio::test]
async fn admin_routes_require_the_session_cookie() {
    let doc = ApiDoc::openapi();
    let schemes = doc
        .components
        .as_ref()
        .map(|c| c.security_schemes.keys().cloned().collect::<Vec<_>>())
        .unwrap_or_default();
    assert!(schemes.contains(&"admin_session".to_string()));
}
