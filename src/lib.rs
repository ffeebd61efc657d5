pub mod config;
pub mod error;
pub mod models {
    pub mod event;
    pub mod gallery;
    pub mod member;
    pub mod news;
    pub mod project;
    pub mod search;
    pub mod snapshot;
    pub mod wire;
}
pub mod search {
    pub mod debounce;
    pub mod discovery;
    pub mod engine;
    pub mod entities;
    pub mod facets;
    pub mod filter;
    pub mod relevance;
    pub mod session;
    pub mod strategy;
}
pub mod fetch {
    pub mod client;
    pub mod store;
}
pub mod notices {
    pub mod board;
    pub mod store;
}
pub mod notifications {
    pub mod client;
    pub mod feed;
    pub mod inbox;
    pub mod policy;
    pub mod transport;
}

#[cfg(feature = "server")]
pub mod app;
#[cfg(feature = "server")]
pub mod api {
    pub mod errors;
    pub mod notifications;
    pub mod search;
}
