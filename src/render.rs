mod github;

pub use self::github::GithubApiRenderer;
