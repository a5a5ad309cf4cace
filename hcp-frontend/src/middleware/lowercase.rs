use super::context_of;
use axum::extract::Request;
use axum::http::uri::PathAndQuery;
use axum::http::Uri;
use axum::middleware::Next;
use axum::response::Response;

/// Lowercases the URI path for case-insensitive routing; the query string is
/// left as sent. The original path is kept in the context.
pub async fn handle(mut req: Request, next: Next) -> Response {
    let original = req.uri().path().to_string();
    let ctx = context_of(req.extensions()).with_original_path(original.clone());
    req.extensions_mut().insert(ctx);

    if let Some(uri) = lowercase_path(req.uri()) {
        *req.uri_mut() = uri;
    }

    next.run(req).await
}

/// The URI with its path lowercased, or `None` when it is already lowercase.
fn lowercase_path(uri: &Uri) -> Option<Uri> {
    let path = uri.path();
    if !path.bytes().any(|b| b.is_ascii_uppercase()) {
        return None;
    }

    let lowered = match uri.query() {
        Some(query) => format!("{}?{}", path.to_ascii_lowercase(), query),
        None => path.to_ascii_lowercase(),
    };
    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(lowered).ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_path_keeps_query() {
        let uri: Uri = "/SUBSCRIPTIONS/ABC/resourceGroups/RG?api-version=2024-06-10-PREVIEW"
            .parse()
            .unwrap();
        let lowered = lowercase_path(&uri).unwrap();
        assert_eq!(lowered.path(), "/subscriptions/abc/resourcegroups/rg");
        assert_eq!(lowered.query(), Some("api-version=2024-06-10-PREVIEW"));
    }

    #[test]
    fn test_already_lowercase() {
        let uri: Uri = "/healthz/ready".parse().unwrap();
        assert!(lowercase_path(&uri).is_none());
    }
}
