/// Request header carrying an admin token.
pub const TOKEN_HEADER: &str = "token";

// Quiz limits
pub const MIN_QUIZ_NAME_LENGTH: usize = 3;
pub const MAX_QUIZ_NAME_LENGTH: usize = 30;
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
pub const MAX_QUIZ_DURATION_SECS: u32 = 180;

// Question limits
pub const MIN_QUESTION_LENGTH: usize = 5;
pub const MAX_QUESTION_LENGTH: usize = 50;
pub const MIN_ANSWERS: usize = 2;
pub const MAX_ANSWERS: usize = 6;
pub const MIN_POINTS: i64 = 1;
pub const MAX_POINTS: i64 = 10;
pub const MIN_ANSWER_LENGTH: usize = 1;
pub const MAX_ANSWER_LENGTH: usize = 30;

/// Answer colours, handed out in order as answers are created.
pub const ANSWER_COLOURS: &[&str] = &["red", "blue", "green", "yellow", "purple", "brown", "orange"];

// User limits
pub const MIN_USER_NAME_LENGTH: usize = 2;
pub const MAX_USER_NAME_LENGTH: usize = 20;
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Session limits
pub const MAX_AUTO_START_NUM: i64 = 50;
pub const MAX_ACTIVE_SESSIONS: usize = 10;
pub const DEFAULT_COUNTDOWN_SECS: u64 = 3;

// Generated player names
pub const PLAYER_NAME_LETTERS: usize = 5;
pub const PLAYER_NAME_DIGITS: usize = 3;
