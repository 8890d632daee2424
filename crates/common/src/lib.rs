pub mod assets;
pub mod citations;
pub mod logger;
pub mod models;
