use crate::{content::Post, error, storage::DBPool};

/// 提供文章与管理员的写操作接口
///
/// 写操作先排队，调用 [`Store::commit`] 时在同一事务中执行。
pub trait Store: Send + Sync {
    /// 插入或更新文章
    fn upsert_post(&mut self, post: &Post) -> &mut Self;
    /// 删除指定 slug 的文章
    fn remove_post(&mut self, slug: &str) -> &mut Self;
    /// 仅当还没有任何管理员时登记管理员
    fn add_first_admin(&mut self, uid: &str, email: &str) -> &mut Self;
    /// 提交更改，返回受影响的总行数
    fn commit(self) -> impl std::future::Future<Output = Result<u64, error::Error>> + Send;
}

/// sqlx 的 [`Store`] 实现
pub struct SqlxStore {
    pool: DBPool,
    queries: Vec<sqlx::query::Query<'static, sqlx::Postgres, sqlx::postgres::PgArguments>>,
}

impl SqlxStore {
    pub fn new(pool: DBPool) -> Self {
        Self {
            pool,
            queries: Default::default(),
        }
    }
}

impl Store for SqlxStore {
    fn upsert_post(&mut self, post: &Post) -> &mut Self {
        let q = sqlx::query(
            "
            INSERT INTO posts
                (slug, title, url, category, category_slug, author, author_slug,
                 date, datetime, image, content, excerpt)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (slug)
            DO UPDATE SET
                title = EXCLUDED.title,
                url = EXCLUDED.url,
                category = EXCLUDED.category,
                category_slug = EXCLUDED.category_slug,
                author = EXCLUDED.author,
                author_slug = EXCLUDED.author_slug,
                date = EXCLUDED.date,
                datetime = EXCLUDED.datetime,
                image = EXCLUDED.image,
                content = EXCLUDED.content,
                excerpt = EXCLUDED.excerpt,
                updated_at = now()
            ",
        )
        .bind(post.slug.to_owned())
        .bind(post.title.to_owned())
        .bind(post.url())
        .bind(post.category.to_owned())
        .bind(post.category_slug())
        .bind(post.author.to_owned())
        .bind(post.author_slug())
        .bind(post.display_date())
        .bind(post.datetime)
        .bind(post.image.to_owned())
        .bind(post.rendered_content.to_owned())
        .bind(post.excerpt.to_owned());

        self.queries.push(q);
        self
    }

    fn remove_post(&mut self, slug: &str) -> &mut Self {
        let q = sqlx::query("DELETE FROM posts WHERE slug = $1").bind(slug.to_owned());
        self.queries.push(q);
        self
    }

    fn add_first_admin(&mut self, uid: &str, email: &str) -> &mut Self {
        // 并发初始化时只允许一个事务写入
        self.queries
            .push(sqlx::query("LOCK TABLE admins IN SHARE ROW EXCLUSIVE MODE"));

        let q = sqlx::query(
            r#"
            INSERT INTO admins (uid, email)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM admins)
            "#,
        )
        .bind(uid.to_owned())
        .bind(email.to_owned());

        self.queries.push(q);
        self
    }

    async fn commit(mut self) -> Result<u64, error::Error> {
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;

        for q in self.queries.drain(..) {
            affected += q.execute(tx.as_mut()).await?.rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }
}
