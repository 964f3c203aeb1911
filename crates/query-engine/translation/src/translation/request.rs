//! Build the URLs of the Feldera endpoints we call.

use url::Url;

use super::error::RequestConstructionError;

/// Row format requested from the ad-hoc query endpoint.
pub const QUERY_FORMAT: &str = "json";

/// `{base_url}/v0/pipelines/{pipeline}/query?format=json&sql={sql}`.
///
/// The pipeline name is encoded as a single path segment and the query
/// parameters are form-encoded.
pub fn query_url(
    base_url: &Url,
    pipeline: &str,
    sql: &str,
) -> Result<Url, RequestConstructionError> {
    let mut url = endpoint(base_url, &["v0", "pipelines", pipeline, "query"])?;
    url.query_pairs_mut()
        .append_pair("format", QUERY_FORMAT)
        .append_pair("sql", sql);
    Ok(url)
}

/// `{base_url}/v0/pipelines`, the listing endpoint used to probe the service.
pub fn health_url(base_url: &Url) -> Result<Url, RequestConstructionError> {
    endpoint(base_url, &["v0", "pipelines"])
}

fn endpoint(base_url: &Url, segments: &[&str]) -> Result<Url, RequestConstructionError> {
    let mut url = base_url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| RequestConstructionError::CannotBeABase(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use similar_asserts::assert_eq;
    use url::Url;

    use super::*;

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn builds_query_url() {
        let url = query_url(&base("http://localhost:8080"), "otel", "SELECT * FROM v0").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v0/pipelines/otel/query?format=json&sql=SELECT+*+FROM+v0"
        );
    }

    #[test]
    fn query_parameters_round_trip() {
        let sql = "SELECT * FROM v0 WHERE ts > '2024-03-01T10:00:00Z' AND name = 'a&b=c'";
        let url = query_url(&base("http://localhost:8080"), "otel", sql).unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("format".to_string(), "json".to_string()),
                ("sql".to_string(), sql.to_string()),
            ]
        );
    }

    #[test]
    fn keeps_base_path_and_tolerates_trailing_slash() {
        let url = query_url(&base("https://example.com/feldera/"), "otel", "SELECT 1").unwrap();
        assert_eq!(url.path(), "/feldera/v0/pipelines/otel/query");

        let url = health_url(&base("https://example.com/feldera")).unwrap();
        assert_eq!(url.as_str(), "https://example.com/feldera/v0/pipelines");
    }

    #[test]
    fn encodes_pipeline_name_as_one_segment() {
        let url = query_url(&base("http://localhost:8080"), "a/b c", "SELECT 1").unwrap();
        assert_eq!(url.path(), "/v0/pipelines/a%2Fb%20c/query");
    }

    #[test]
    fn health_url_has_no_query() {
        let url = health_url(&base("http://localhost:8080/?x=1")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v0/pipelines");
    }

    #[test]
    fn rejects_opaque_base_urls() {
        let err = health_url(&base("mailto:someone@example.com")).unwrap_err();
        assert!(matches!(err, RequestConstructionError::CannotBeABase(_)));
    }
}
