//! # Database
//!
//! SQLite-backed persistence for guild tags. The schema is applied in full at
//! startup from `schema.sql`; every statement in that script is idempotent.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial implementation with tag CRUD

use anyhow::Result;
use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = include_str!("../../schema.sql");

/// A guild-scoped stored text snippet.
///
/// Invariant: `(guild, name)` is unique and `name` is stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub guild: i64,
    pub author: i64,
    pub created_at: i64,
}

/// Name and id pair as shown by `/tag list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSummary {
    pub name: String,
    pub id: i64,
}

/// Handle to the bot database.
///
/// Cloning is cheap; all clones share one serialized connection. Queries take
/// the lock for the duration of one statement and never hold it across awaits.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<sqlite::ConnectionWithFullMutex>>,
}

impl Database {
    /// Open (or create) the database file and apply the schema script.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = sqlite::Connection::open_with_full_mutex(path)?;
        conn.execute(SCHEMA)?;
        info!("Database ready at {path}");
        Ok(Database {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Fetch a tag by guild and (case-insensitive) name.
    pub async fn get_tag(&self, guild: i64, name: &str) -> Result<Option<Tag>> {
        let name = name.to_lowercase();
        let conn = self.conn.lock().await;

        let mut statement = conn.prepare(
            "SELECT id, name, content, guild, author, created_at
             FROM tags WHERE guild = ? AND name = ?",
        )?;
        statement.bind((1, guild))?;
        statement.bind((2, name.as_str()))?;

        if let sqlite::State::Row = statement.next()? {
            Ok(Some(Tag {
                id: statement.read::<i64, _>("id")?,
                name: statement.read::<String, _>("name")?,
                content: statement.read::<String, _>("content")?,
                guild: statement.read::<i64, _>("guild")?,
                author: statement.read::<i64, _>("author")?,
                created_at: statement.read::<i64, _>("created_at")?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Insert a new tag. The name is lowercased before storage; inserting a
    /// duplicate `(guild, name)` fails on the UNIQUE constraint.
    pub async fn create_tag(
        &self,
        guild: i64,
        author: i64,
        name: &str,
        content: &str,
        created_at: i64,
    ) -> Result<()> {
        let name = name.to_lowercase();
        let conn = self.conn.lock().await;

        let mut statement = conn.prepare(
            "INSERT INTO tags (name, content, guild, author, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )?;
        statement.bind((1, name.as_str()))?;
        statement.bind((2, content))?;
        statement.bind((3, guild))?;
        statement.bind((4, author))?;
        statement.bind((5, created_at))?;
        statement.next()?;
        Ok(())
    }

    /// Replace a tag's content. When `author` is given the update only applies
    /// to tags owned by that user; pass `None` for a moderator bypass.
    ///
    /// Returns the number of rows changed (0 when nothing matched).
    pub async fn update_tag_content(
        &self,
        guild: i64,
        name: &str,
        content: &str,
        author: Option<i64>,
    ) -> Result<usize> {
        let name = name.to_lowercase();
        let conn = self.conn.lock().await;

        let mut statement = match author {
            Some(author_id) => {
                let mut st = conn.prepare(
                    "UPDATE tags SET content = ? WHERE name = ? AND guild = ? AND author = ?",
                )?;
                st.bind((4, author_id))?;
                st
            }
            None => conn.prepare("UPDATE tags SET content = ? WHERE name = ? AND guild = ?")?,
        };
        statement.bind((1, content))?;
        statement.bind((2, name.as_str()))?;
        statement.bind((3, guild))?;
        statement.next()?;

        Ok(conn.change_count())
    }

    /// Delete a tag. Same author semantics as [`Database::update_tag_content`].
    pub async fn delete_tag(&self, guild: i64, name: &str, author: Option<i64>) -> Result<usize> {
        let name = name.to_lowercase();
        let conn = self.conn.lock().await;

        let mut statement = match author {
            Some(author_id) => {
                let mut st = conn
                    .prepare("DELETE FROM tags WHERE name = ? AND guild = ? AND author = ?")?;
                st.bind((3, author_id))?;
                st
            }
            None => conn.prepare("DELETE FROM tags WHERE name = ? AND guild = ?")?,
        };
        statement.bind((1, name.as_str()))?;
        statement.bind((2, guild))?;
        statement.next()?;

        Ok(conn.change_count())
    }

    /// All tags of a guild, sorted by name.
    pub async fn list_tags(&self, guild: i64) -> Result<Vec<TagSummary>> {
        let conn = self.conn.lock().await;

        let mut statement =
            conn.prepare("SELECT name, id FROM tags WHERE guild = ? ORDER BY name")?;
        statement.bind((1, guild))?;

        let mut tags = Vec::new();
        while let sqlite::State::Row = statement.next()? {
            tags.push(TagSummary {
                name: statement.read::<String, _>("name")?,
                id: statement.read::<i64, _>("id")?,
            });
        }
        Ok(tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_create_and_get_tag() {
        let (_dir, db) = test_db().await;

        db.create_tag(1, 10, "Greeting", "hello there", 1700000000)
            .await
            .unwrap();

        let tag = db.get_tag(1, "greeting").await.unwrap().unwrap();
        assert_eq!(tag.name, "greeting");
        assert_eq!(tag.content, "hello there");
        assert_eq!(tag.author, 10);
        assert_eq!(tag.created_at, 1700000000);
    }

    #[tokio::test]
    async fn test_get_tag_is_case_insensitive() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "rules", "be nice", 0).await.unwrap();

        assert!(db.get_tag(1, "RULES").await.unwrap().is_some());
        assert!(db.get_tag(1, "Rules").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_name_same_guild_rejected() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "dup", "first", 0).await.unwrap();

        let result = db.create_tag(1, 20, "DUP", "second", 0).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_same_name_different_guilds_allowed() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "shared", "guild one", 0).await.unwrap();
        db.create_tag(2, 10, "shared", "guild two", 0).await.unwrap();

        assert_eq!(
            db.get_tag(2, "shared").await.unwrap().unwrap().content,
            "guild two"
        );
    }

    #[tokio::test]
    async fn test_update_requires_matching_author() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "mine", "original", 0).await.unwrap();

        let changed = db
            .update_tag_content(1, "mine", "hijacked", Some(99))
            .await
            .unwrap();
        assert_eq!(changed, 0);
        assert_eq!(
            db.get_tag(1, "mine").await.unwrap().unwrap().content,
            "original"
        );

        let changed = db
            .update_tag_content(1, "mine", "edited", Some(10))
            .await
            .unwrap();
        assert_eq!(changed, 1);
    }

    #[tokio::test]
    async fn test_update_with_moderator_bypass() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "mine", "original", 0).await.unwrap();

        let changed = db
            .update_tag_content(1, "mine", "moderated", None)
            .await
            .unwrap();
        assert_eq!(changed, 1);
    }

    #[tokio::test]
    async fn test_delete_requires_matching_author() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "gone", "soon", 0).await.unwrap();

        assert_eq!(db.delete_tag(1, "gone", Some(99)).await.unwrap(), 0);
        assert_eq!(db.delete_tag(1, "gone", Some(10)).await.unwrap(), 1);
        assert!(db.get_tag(1, "gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_tags_sorted_per_guild() {
        let (_dir, db) = test_db().await;
        db.create_tag(1, 10, "zebra", "z", 0).await.unwrap();
        db.create_tag(1, 10, "apple", "a", 0).await.unwrap();
        db.create_tag(2, 10, "other", "o", 0).await.unwrap();

        let tags = db.list_tags(1).await.unwrap();
        let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["apple", "zebra"]);
    }

    #[tokio::test]
    async fn test_list_tags_empty_guild() {
        let (_dir, db) = test_db().await;
        assert!(db.list_tags(42).await.unwrap().is_empty());
    }
}
