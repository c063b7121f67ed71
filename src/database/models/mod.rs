pub mod articles;
pub mod help_request;
pub mod menu_item_review;
pub mod recommendation_request;
pub mod user;
