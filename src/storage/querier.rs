use super::{DBPool, PostDetail, PostSummary, SitemapEntry, Taxonomy};

const SUMMARY_COLUMNS: &str = r#"
    p.slug, p.title, p.url, p.category, p.category_slug, p.author, p.author_slug,
    p.date, p.datetime, p.image, p.excerpt
"#;

/// 用于查询文章相关数据
///
/// 提供获取文章详情、列表、归档、sitemap 以及管理员信息的接口。
pub trait Querier: Send + Sync {
    type Error;

    /// 查询单个文章详情
    ///
    /// 返回 [`PostDetail`]，如果文章不存在则返回 `None`。
    fn post(
        &self,
        slug: impl AsRef<str> + Send,
    ) -> impl std::future::Future<Output = Result<Option<PostDetail>, Self::Error>> + Send;

    /// 分页查询文章列表
    ///
    /// 按发布时间倒序，可按分类或作者的 slug 过滤。
    fn post_list(
        &self,
        page: i32,
        size: i32,
        category: Option<&str>,
        author: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<PostSummary>, Self::Error>> + Send;

    /// 所有文章的 slug 与更新时间
    fn sitemap_entries(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SitemapEntry>, Self::Error>> + Send;

    /// 查询所有分类及其文章数
    fn categories(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Taxonomy>, Self::Error>> + Send;

    /// 查询所有作者及其文章数
    fn authors(&self)
    -> impl std::future::Future<Output = Result<Vec<Taxonomy>, Self::Error>> + Send;

    /// 判断 uid 是否已登记为管理员
    fn is_admin(
        &self,
        uid: &str,
    ) -> impl std::future::Future<Output = Result<bool, Self::Error>> + Send;

    /// 已登记的管理员数量
    fn admin_count(&self)
    -> impl std::future::Future<Output = Result<i64, Self::Error>> + Send;
}

impl Querier for DBPool {
    type Error = sqlx::Error;

    async fn post(&self, slug: impl AsRef<str> + Send) -> Result<Option<PostDetail>, Self::Error> {
        sqlx::query_as::<_, PostDetail>(
            r#"
            SELECT slug, title, url, category, category_slug, author, author_slug,
                   date, datetime, image, content, excerpt, created_at, updated_at
            FROM posts
            WHERE slug = $1
            LIMIT 1
            "#,
        )
        .bind(slug.as_ref())
        .fetch_optional(self)
        .await
    }

    async fn post_list(
        &self,
        page: i32,
        size: i32,
        category: Option<&str>,
        author: Option<&str>,
    ) -> Result<Vec<PostSummary>, sqlx::Error> {
        let offset = page_offset(page, size);
        let mut builder = sqlx::QueryBuilder::new("SELECT ");
        builder.push(SUMMARY_COLUMNS);
        builder.push(" FROM posts p WHERE TRUE");

        if let Some(c) = category {
            builder.push(" AND p.category_slug = ").push_bind(c.to_owned());
        }
        if let Some(a) = author {
            builder.push(" AND p.author_slug = ").push_bind(a.to_owned());
        }

        builder.push(" ORDER BY p.datetime DESC, p.id DESC ");
        builder.push(" LIMIT ").push_bind(size);
        builder.push(" OFFSET ").push_bind(offset);

        builder
            .build_query_as::<PostSummary>()
            .fetch_all(self)
            .await
    }

    async fn sitemap_entries(&self) -> Result<Vec<SitemapEntry>, sqlx::Error> {
        sqlx::query_as::<_, SitemapEntry>(
            r#"
            SELECT slug, updated_at
            FROM posts
            ORDER BY datetime DESC
            "#,
        )
        .fetch_all(self)
        .await
    }

    async fn categories(&self) -> Result<Vec<Taxonomy>, sqlx::Error> {
        sqlx::query_as::<_, Taxonomy>(
            r#"
            SELECT category_slug AS slug, MIN(category) AS name, COUNT(*) AS post_count
            FROM posts
            WHERE category_slug <> ''
            GROUP BY category_slug
            ORDER BY category_slug
            "#,
        )
        .fetch_all(self)
        .await
    }

    async fn authors(&self) -> Result<Vec<Taxonomy>, sqlx::Error> {
        sqlx::query_as::<_, Taxonomy>(
            r#"
            SELECT author_slug AS slug, MIN(author) AS name, COUNT(*) AS post_count
            FROM posts
            WHERE author_slug <> ''
            GROUP BY author_slug
            ORDER BY author_slug
            "#,
        )
        .fetch_all(self)
        .await
    }

    async fn is_admin(&self, uid: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM admins WHERE uid = $1)")
            .bind(uid)
            .fetch_one(self)
            .await
    }

    async fn admin_count(&self) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(self)
            .await
    }
}

/// 分页偏移量，页码小于 1 按第一页处理，溢出时取 `i64::MAX`
fn page_offset(page: i32, size: i32) -> i64 {
    (i64::from(page.max(1)) - 1).saturating_mul(i64::from(size.max(0)))
}
