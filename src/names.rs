pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Question shape limits
pub const MIN_OPTIONS: usize = 2;
pub const MAX_OPTIONS: usize = 5;
pub const MAX_QUESTIONS_PER_QUIZ: i64 = 10;

// Permalink policy: short base-36 token, unique across all quizzes.
// A collision is resolved by re-drawing, bounded by the attempt cap.
pub const PERMALINK_LENGTH: usize = 6;
pub const PERMALINK_MAX_ATTEMPTS: u32 = 5;
pub const PERMALINK_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
