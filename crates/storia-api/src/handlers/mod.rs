pub mod generate;
pub mod hashtags;
pub mod products;
pub mod publish;
pub mod webhooks;
