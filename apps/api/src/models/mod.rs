pub mod history;
pub mod question;
pub mod resume;
