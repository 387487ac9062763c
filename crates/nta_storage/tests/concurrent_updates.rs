use std::sync::Arc;

use futures::future::join_all;

use nta_core::storage::{RECIPIENT_COMMENT, RECIPIENT_KEY};
use nta_core::ConfigStore;
use nta_storage::EnvFileStore;

const ORIGINAL: &str = "# News API credentials\n\
NEWS_API_KEY=abc\n\
\n\
# Twilio credentials\n\
TWILIO_PHONE_NUMBER=+1234567890\n\
RECIPIENT_PHONE_NUMBER=+10000000000  # comment\n\
AWS_REGION=us-east-1";

#[tokio::test]
async fn test_concurrent_registrations_leave_a_consistent_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".env");
    std::fs::write(&path, ORIGINAL).unwrap();
    let store = Arc::new(EnvFileStore::new(&path));

    let numbers: Vec<String> = (0..16).map(|i| format!("+1415555{:04}", i)).collect();
    let updates = numbers.iter().map(|number| {
        let store = store.clone();
        let number = number.clone();
        tokio::spawn(async move {
            store
                .upsert(RECIPIENT_KEY, &number, Some(RECIPIENT_COMMENT))
                .await
                .unwrap();
        })
    });
    for result in join_all(updates).await {
        result.unwrap();
    }

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    let original: Vec<&str> = ORIGINAL.lines().collect();
    assert_eq!(lines.len(), original.len());

    for (new, old) in lines.iter().zip(&original) {
        if old.starts_with("RECIPIENT_PHONE_NUMBER=") {
            let value = new
                .strip_prefix("RECIPIENT_PHONE_NUMBER=")
                .and_then(|rest| rest.strip_suffix("  # Format: whatsapp:+1234567890"))
                .expect("recipient line keeps its shape");
            assert!(numbers.iter().any(|n| n == value));
        } else {
            assert_eq!(new, old);
        }
    }

    // Only the final file remains in the directory: temp files were renamed into place.
    let entries = std::fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}
