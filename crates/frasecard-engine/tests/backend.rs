//! Session tests against mocked HTTP backends.

mod common;

use common::{llm_for_mock, mock_completions, mock_search, search_for_mock, setup_mock_server};
use frasecard_engine::{CardDraft, CardSessionController, Error, WebImageProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_blank_card_through_http_clients() {
    let server = setup_mock_server().await;
    mock_completions(&server, "dormir").await;
    mock_search(
        &server,
        &[
            "https://www.instagram.com/p/1.jpg",
            "https://img.test/gato.jpg",
            "https://lookaside.fbsbx.com/x.jpg",
            "https://img.test/sofa.jpg",
        ],
    )
    .await;

    let llm = llm_for_mock(&server);
    let provider = WebImageProvider::new(llm.clone(), search_for_mock(&server));
    let mut session = CardSessionController::new(llm, provider);

    session.set_sentence("El gato duerme").unwrap();
    let draft = session.start_blank(2).await.unwrap();
    match draft {
        CardDraft::Blank(d) => assert_eq!(d.clue, "dormir"),
        other => panic!("unexpected draft {:?}", other),
    }

    let candidates = session.session().candidates();
    assert_eq!(candidates.query, "dormir");
    assert_eq!(
        candidates.urls,
        ["https://img.test/gato.jpg", "https://img.test/sofa.jpg"]
    );

    session.select_candidate(1).unwrap();
    session.commit().unwrap();
    assert_eq!(
        session.cards()[0].card().image_url(),
        Some("https://img.test/sofa.jpg")
    );
}

#[tokio::test]
async fn test_definition_queries_search_with_refined_base_form() {
    let server = setup_mock_server().await;
    mock_completions(&server, "gato").await;
    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("q", "gato"))
        .and(query_param("searchType", "image"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let llm = llm_for_mock(&server);
    let provider = WebImageProvider::new(llm.clone(), search_for_mock(&server));
    let mut session = CardSessionController::new(llm, provider);

    session.set_sentence("Los gatos duermen").unwrap();
    session.start_definition(1).await.unwrap();
    assert!(session.session().candidates().urls.is_empty());
}

#[tokio::test]
async fn test_backend_error_leaves_session_idle() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let llm = llm_for_mock(&server);
    let provider = WebImageProvider::new(llm.clone(), search_for_mock(&server));
    let mut session = CardSessionController::new(llm, provider);

    session.set_sentence("El gato duerme").unwrap();
    let err = session.start_blank(1).await.unwrap_err();
    assert!(matches!(err, Error::Service(frasecard::Error::Api { status: 500, .. })));
    assert!(err.is_retryable());
    assert!(session.session().draft().is_none());
}
