//! The client wiring end to end: votes against a live ratings server and
//! against the local file ledger, and a generation with the mock backend.

use std::path::Path;
use std::sync::Arc;

use image_generation::DEFAULT_MODEL;
use photo_effects::catalog::SortOption;
use photo_effects::generation::GenerationSession;
use photo_effects::uploads::load_upload;
use photo_effects::{ClientConfig, Dependencies};
use ratings_ledger::{InMemoryRatingLedger, RatingLedger};
use ratings_shared::types::{Aggregate, Choice, Ratings};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn config(data_dir: &Path, ledger_url: Option<String>) -> ClientConfig {
    ClientConfig {
        ledger_url,
        data_dir: data_dir.to_path_buf(),
        gemini_api_key: None,
        gemini_base_url: "http://127.0.0.1:1".to_string(),
        gemini_model: DEFAULT_MODEL.to_string(),
        mock_generator: true,
    }
}

async fn spawn_server(seed: Ratings) -> (String, oneshot::Sender<()>) {
    let ledger: Arc<dyn RatingLedger> = Arc::new(InMemoryRatingLedger::with_ratings(seed));
    let app = ratings_server::create_app(ledger, &[]);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        ratings_server::run_server(app, listener, async {
            let _ = rx.await;
        })
        .await
        .unwrap();
    });

    (base_url, tx)
}

#[tokio::test]
async fn test_votes_against_remote_ledger() {
    let mut seed = Ratings::new();
    seed.insert("vintage".to_string(), Aggregate::new(5, 2));
    let (base_url, _shutdown) = spawn_server(seed).await;

    let dir = tempfile::tempdir().unwrap();
    let deps = Dependencies::new(&config(dir.path(), Some(base_url))).unwrap();

    let outcome = deps.feedback.submit_vote("vintage", Choice::Bad).await.unwrap();
    assert_eq!(outcome.aggregate, Aggregate::new(5, 3));

    let outcome = deps.feedback.submit_vote("vintage", Choice::Good).await.unwrap();
    assert_eq!(outcome.aggregate, Aggregate::new(6, 2));

    let outcome = deps.feedback.submit_vote("vintage", Choice::Good).await.unwrap();
    assert!(!outcome.changed);
    assert_eq!(outcome.ratings["vintage"], Aggregate::new(6, 2));

    // The popular ordering reflects the server's aggregates.
    let ratings = deps.feedback.ratings().await.unwrap();
    let votes = deps.feedback.user_votes().await;
    let rated = deps.catalog.rated(&ratings, &votes, SortOption::Popular);
    assert_eq!(rated[0].effect.id, "vintage");
    assert_eq!(rated[0].user_vote, Some(Choice::Good));
}

#[tokio::test]
async fn test_local_ledger_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let deps = Dependencies::new(&config(dir.path(), None)).unwrap();
        deps.feedback.submit_vote("anime", Choice::Good).await.unwrap();
        deps.feedback.submit_vote("anime", Choice::Bad).await.unwrap();
    }

    let deps = Dependencies::new(&config(dir.path(), None)).unwrap();
    assert_eq!(deps.feedback.user_vote("anime").await, Some(Choice::Bad));
    assert_eq!(
        deps.feedback.ratings().await.unwrap()["anime"],
        Aggregate::new(0, 1)
    );
}

#[tokio::test]
async fn test_generate_with_mock_backend() {
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("me.png");
    std::fs::write(&photo, [0x89, b'P', b'N', b'G']).unwrap();

    let deps = Dependencies::new(&config(dir.path(), None)).unwrap();
    let effect = deps.catalog.get("vintage").cloned().unwrap();
    let session = GenerationSession::new(effect, deps.generator().unwrap());
    session
        .set_images(vec![load_upload(&photo).await.unwrap()])
        .await
        .unwrap();

    let image = session.generate().await.unwrap();
    assert_eq!(image.bytes, vec![0x89, b'P', b'N', b'G']);
    assert_eq!(image.file_name("vintage"), "vintage-result.png");
}

#[tokio::test]
async fn test_missing_api_key_only_blocks_generation() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config(dir.path(), None);
    config.mock_generator = false;

    let deps = Dependencies::new(&config).unwrap();
    assert!(deps.generator().is_err());
    assert!(deps.feedback.ratings().await.unwrap().is_empty());
}
