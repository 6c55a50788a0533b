mod post;
mod slug;

pub use self::{
    post::{FrontMatter, Post, PostBuilder, PostDraft, Renderer, display_date, post_url},
    slug::{excerpt_from_html, slugify},
};
