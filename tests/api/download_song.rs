use claims::{assert_err, assert_ok};
use songdl::youtube::{DownloadError, DownloadSongError, SearchError};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{FAILING_STUB, TestApp};

fn search_hit(title: &str) -> serde_json::Value {
    serde_json::json!({
        "items": [{
            "id": { "videoId": "dQw4w9WgXcQ" },
            "snippet": { "title": title }
        }]
    })
}

fn no_hits() -> serde_json::Value {
    serde_json::json!({ "items": [] })
}

#[tokio::test]
async fn the_top_hit_is_downloaded_under_its_cleaned_title() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .and(query_param("q", "song name lyrics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(search_hit("Song Name (Official Lyrics Video) 🎵")),
        )
        .expect(1)
        .mount(&app.search_server)
        .await;

    let file_name = assert_ok!(app.youtube.download_song_by_name("song name").await);

    assert_eq!(file_name, "Song Name.mp3");
    assert_eq!(app.music_files(), vec!["Song Name.mp3"]);

    let args = app
        .recorded_downloader_args()
        .expect("the downloader was never invoked");
    assert!(args.iter().any(|arg| arg.ends_with("Song Name.%(ext)s")));
    assert!(args.contains(&"--no-playlist".to_string()));
    assert!(args.contains(&"192K".to_string()));
    assert_eq!(
        args.last().map(String::as_str),
        Some("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    );
}

#[tokio::test]
async fn no_search_matches_mean_no_download_and_no_file() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(no_hits()))
        .expect(1)
        .mount(&app.search_server)
        .await;

    let outcome = app.youtube.download_song_by_name("asdkjasdkj").await;

    assert_err!(&outcome);
    assert!(matches!(
        outcome,
        Err(DownloadSongError::Search(SearchError::NoResults))
    ));
    assert!(app.recorded_downloader_args().is_none());
    assert!(app.music_files().is_empty());
}

#[tokio::test]
async fn a_title_of_nothing_but_noise_is_rejected_before_downloading() {
    let app = TestApp::spawn_app().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit("Official Music Video (HD)")))
        .mount(&app.search_server)
        .await;

    let outcome = app.youtube.download_song_by_name("some song").await;

    assert!(matches!(outcome, Err(DownloadSongError::InvalidTitle(_))));
    assert!(app.recorded_downloader_args().is_none());
    assert!(app.music_files().is_empty());
}

#[tokio::test]
async fn downloader_failures_carry_the_tools_message() {
    let app = TestApp::spawn_with_downloader(FAILING_STUB).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit("Song Name")))
        .mount(&app.search_server)
        .await;

    let outcome = app.youtube.download_song_by_name("song name").await;

    match outcome {
        Err(DownloadSongError::Download(DownloadError::Failed { stderr, .. })) => {
            assert!(stderr.contains("unable to download video data"));
        }
        other => panic!("expected a download failure, got {:?}", other),
    }
}
