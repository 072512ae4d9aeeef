pub mod answer_review;
pub mod question;
pub mod question_type;
