use quizforge::db::Db;

pub async fn create_test_db() -> Db {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let path =
        std::env::temp_dir().join(format!("quizforge_test_{}_{}.db", std::process::id(), id));
    // Clean up leftover file from previous runs
    let _ = std::fs::remove_file(&path);
    let url = format!("file:{}", path.display());
    Db::new(url, String::new())
        .await
        .expect("failed to create test database")
}

/// Create a user with a live session token. Token issuance is outside the
/// service, so tests mint sessions straight through the db layer.
#[allow(dead_code)]
pub async fn seed_author(db: &Db, email: &str) -> (i64, String) {
    let user_id = db
        .create_user(email, "Test Author")
        .await
        .expect("failed to create user");
    let token = db
        .create_user_session(user_id)
        .await
        .expect("failed to create session");
    (user_id, token)
}
