mod models;
mod postgres;
mod querier;
mod store;

pub use self::{
    models::{PostDetail, PostSummary, SitemapEntry, Taxonomy},
    postgres::{DBPool, MIGRATIONS, init_db_from_env, migrate, new_db_poll},
    querier::Querier,
    store::{SqlxStore, Store},
};
