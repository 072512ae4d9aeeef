pub mod answer_classifier;
pub mod api_service;
pub mod catalog;
pub mod question_editor;
pub mod review_queue;
pub mod review_submission;
