use base64::{Engine as _, engine::general_purpose::STANDARD};
use repo_docs_mcp::config::{AdapterConfig, RepositoryLocation};
use repo_docs_mcp::error::DocsError;
use repo_docs_mcp::github::GitHubConnector;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn connector(server: &MockServer) -> GitHubConnector {
    let config = AdapterConfig::new(RepositoryLocation::new("acme", "widgets")).with_api_base(server.uri());
    GitHubConnector::new(reqwest::Client::new(), &config)
}

fn readme_body(text: &str) -> serde_json::Value {
    json!({
        "type": "file",
        "name": "README.md",
        "size": text.len(),
        "content": STANDARD.encode(text),
    })
}

/// The (filename, ref) pairs the server saw, in arrival order.
async fn attempts(server: &MockServer) -> Vec<(String, String)> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|request| {
            let filename = request.url.path().rsplit('/').next().unwrap().to_string();
            let branch = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "ref")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();
            (filename, branch)
        })
        .collect()
}

fn expected(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(f, b)| (f.to_string(), b.to_string()))
        .collect()
}

#[tokio::test]
async fn test_readme_found_on_second_casing_stops_probing() {
    let server = MockServer::start().await;

    // Only the lowercase variant exists on main
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/readme.md"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(readme_body("# Widgets\n\nHello.")))
        .expect(1)
        .mount(&server)
        .await;

    // Look up the README starting from main
    let readme = connector(&server).get_readme("main").await.unwrap();

    // Verify the lowercase variant was returned
    assert_eq!(readme.filename, "readme.md");
    assert_eq!(readme.branch, "main");
    assert_eq!(readme.content, "# Widgets\n\nHello.");

    // Nothing is requested after the first hit
    assert_eq!(
        attempts(&server).await,
        expected(&[("README.md", "main"), ("readme.md", "main")])
    );
}

#[tokio::test]
async fn test_readme_falls_back_to_master() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/Readme.md"))
        .and(query_param("ref", "master"))
        .respond_with(ResponseTemplate::new(200).set_body_json(readme_body("legacy readme")))
        .mount(&server)
        .await;

    // Start from a branch that has no README at all
    let readme = connector(&server).get_readme("develop").await.unwrap();

    assert_eq!(readme.filename, "Readme.md");
    assert_eq!(readme.branch, "master");
    assert_eq!(readme.content, "legacy readme");

    assert_eq!(
        attempts(&server).await,
        expected(&[
            ("README.md", "develop"),
            ("readme.md", "develop"),
            ("Readme.md", "develop"),
            ("README.MD", "develop"),
            ("README.md", "main"),
            ("readme.md", "main"),
            ("Readme.md", "main"),
            ("README.MD", "main"),
            ("README.md", "master"),
            ("readme.md", "master"),
            ("Readme.md", "master"),
        ])
    );
}

#[tokio::test]
async fn test_readme_probes_full_cross_product_before_failing() {
    let server = MockServer::start().await;

    // Mix of failure kinds; none of them should leak into the final error
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/README.md"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = connector(&server).get_readme("main").await.unwrap_err();

    // Verify the error names the repository and nothing else
    assert!(matches!(err, DocsError::ReadmeNotFound { .. }));
    let message = err.to_string();
    assert!(message.contains("acme/widgets"));
    assert!(message.contains("multiple"));
    assert!(!message.contains("500"));
    assert!(!message.contains("exploded"));

    // Requested branch is not deduplicated against the fallbacks
    assert_eq!(
        attempts(&server).await,
        expected(&[
            ("README.md", "main"),
            ("readme.md", "main"),
            ("Readme.md", "main"),
            ("README.MD", "main"),
            ("README.md", "main"),
            ("readme.md", "main"),
            ("Readme.md", "main"),
            ("README.MD", "main"),
            ("README.md", "master"),
            ("readme.md", "master"),
            ("Readme.md", "master"),
            ("README.MD", "master"),
        ])
    );
}

#[tokio::test]
async fn test_readme_skips_undecodable_payload() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/README.md"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "file",
            "content": "!!! not base64 !!!",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/contents/readme.md"))
        .and(query_param("ref", "main"))
        .respond_with(ResponseTemplate::new(200).set_body_json(readme_body("usable")))
        .mount(&server)
        .await;

    let readme = connector(&server).get_readme("main").await.unwrap();
    assert_eq!(readme.filename, "readme.md");
    assert_eq!(readme.content, "usable");
}

#[tokio::test]
async fn test_readme_survives_transport_fault() {
    // Nothing listens on port 1
    let config = AdapterConfig::new(RepositoryLocation::new("acme", "widgets"))
        .with_api_base("http://127.0.0.1:1");
    let connector = GitHubConnector::new(reqwest::Client::new(), &config);

    let err = connector.get_readme("main").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "README not found in acme/widgets (tried multiple branches and filenames)"
    );
}
