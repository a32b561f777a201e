use ksd::{
    catalog,
    descriptor::{DescriptorFetcher, FetchError, HttpDescriptorFetcher},
    episode::{Episode, Token},
};
use mockito::Matcher;
use reqwest::{Client, StatusCode};
use url::Url;

const ENTRIES: &str = r#"[
    {"src":"https://sub.example/170551.en.txt1","label":"English","land":"en","default":true},
    {"src":"https://sub.example/170551.id.txt","label":"Indonesia","land":"id"}
]"#;

fn base_url(server: &mockito::ServerGuard) -> Url {
    Url::parse(&server.url()).unwrap()
}

#[tokio::test]
async fn fetches_with_token_and_referer() {
    let mut server = mockito::Server::new_async().await;
    let base = base_url(&server);
    let episode = Episode::new(8341, 3, 170551);
    let referer = episode.watch_url(&base, "Queen of Tears").unwrap();

    let mock = server
        .mock("GET", "/api/Sub/170551")
        .match_query(Matcher::UrlEncoded("kkey".into(), "A1B2C3".into()))
        .match_header("referer", referer.as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ENTRIES)
        .create_async()
        .await;

    let fetcher = HttpDescriptorFetcher::new(Client::new(), base);
    let entries = fetcher
        .fetch(&episode, "Queen of Tears", Token::new("A1B2C3"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "English");
    assert_eq!(entries[0].language.as_deref(), Some("en"));
    assert_eq!(entries[1].src, "https://sub.example/170551.id.txt");
}

#[tokio::test]
async fn empty_descriptor() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/Sub/7")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let fetcher = HttpDescriptorFetcher::new(Client::new(), base_url(&server));
    let entries = fetcher
        .fetch(&Episode::new(1, 1, 7), "Movie", Token::new("x"))
        .await
        .unwrap();

    assert!(entries.is_empty());
}

#[tokio::test]
async fn rejected_token() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/Sub/7")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let fetcher = HttpDescriptorFetcher::new(Client::new(), base_url(&server));
    let error = fetcher
        .fetch(&Episode::new(1, 1, 7), "Movie", Token::new("stale"))
        .await
        .unwrap_err();

    assert!(matches!(error, FetchError::Status(x) if x == StatusCode::FORBIDDEN));
    assert!(!error.is_malformed());
}

#[tokio::test]
async fn malformed_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/Sub/7")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>Just a moment...</html>")
        .create_async()
        .await;

    let fetcher = HttpDescriptorFetcher::new(Client::new(), base_url(&server));
    let error = fetcher
        .fetch(&Episode::new(1, 1, 7), "Movie", Token::new("x"))
        .await
        .unwrap_err();

    assert!(error.is_malformed());
}

#[tokio::test]
async fn catalog_skips_missing_shows() {
    let mut server = mockito::Server::new_async().await;
    let _found = server
        .mock("GET", "/api/DramaList/Drama/10")
        .with_status(200)
        .with_body(
            r#"{"id":10,"title":"Ten","episodes":[{"id":1002,"number":2.0,"sub":1},{"id":1001,"number":1.0,"sub":1}]}"#,
        )
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/api/DramaList/Drama/11")
        .with_status(404)
        .create_async()
        .await;

    let shows = catalog::fetch_shows(&Client::new(), &base_url(&server), 10..=11).await;

    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0].title, "Ten");
    assert_eq!(shows[0].episodes[0], Episode::new(10, 2, 1002));
    assert_eq!(shows[0].episodes[1].number, 1);
}
