pub mod contact;
pub mod github;
pub mod loading;
pub mod scroll;
