pub mod question_dto;
pub mod review_dto;
