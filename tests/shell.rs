mod common;

use common::app_store;
use std::sync::Arc;
use tabflow::app::{AppState, Tab};
use tabflow::client::Clients;
use tabflow::persistence::MemoryRepository;
use tabflow::shell::Shell;
use tokio::io::BufReader;

async fn run_script(script: &str, repo: Arc<MemoryRepository>) -> (String, AppState) {
    let store = app_store(Clients::fixtures(), repo);
    let observer = store.clone();
    let mut output = Vec::new();

    Shell::new(store)
        .run(BufReader::new(script.as_bytes()), &mut output)
        .await
        .expect("shell I/O failed");

    (
        String::from_utf8(output).expect("output is UTF-8"),
        observer.state(),
    )
}

/// Commands become actions and status lines are printed on change.
#[tokio::test]
async fn test_shell_drives_store_from_commands() {
    let repo = Arc::new(MemoryRepository::new());
    let (output, state) = run_script(
        "fav sport-42\ntab weather\nweather Berlin\nrent Berlin\n",
        repo.clone(),
    )
    .await;

    assert_eq!(state.selected_tab, Tab::Weather);
    assert!(state.favorite_ids.contains("sport-42"));
    assert_eq!(state.weather.city.as_deref(), Some("Berlin"));
    assert_eq!(state.rentals.offers.value().map(Vec::len), Some(2));
    assert_eq!(repo.stored(), vec!["sport-42".to_string()]);
    assert!(output.contains("[weather] Berlin: 12.5°C, Overcast"));
}

/// Bad input is reported and the session continues.
#[tokio::test]
async fn test_shell_reports_bad_commands() {
    let (output, state) = run_script(
        "dance\ntab cinema\ntrack\ntab news\n",
        Arc::new(MemoryRepository::new()),
    )
    .await;

    assert!(output.contains("Unknown command 'dance'"));
    assert!(output.contains("Unknown tab 'cinema'"));
    assert!(output.contains("'track' needs an argument"));
    assert_eq!(state.selected_tab, Tab::News);
}

/// `quit` stops reading; later lines are ignored.
#[tokio::test]
async fn test_shell_quit_stops_processing() {
    let (_output, state) = run_script(
        "tab flights\nquit\ntab rentals\n",
        Arc::new(MemoryRepository::new()),
    )
    .await;
    assert_eq!(state.selected_tab, Tab::Flights);
}

/// `state` prints the full dump including favorites.
#[tokio::test]
async fn test_shell_state_dump() {
    let repo = Arc::new(MemoryRepository::with_ids(["news-2"]));
    let (output, state) = run_script("sports\nstate\n", repo).await;
    assert!(output.contains("tab: sports"));
    assert!(state.favorite_ids.contains("news-2"));
}
