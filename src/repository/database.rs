use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};

use crate::config::Config;
use crate::error::StorageError;
use crate::models::todo::{NewTodo, Todo, TodoChangeset};
use crate::repository::schema::todos::dsl::*;

type DBPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TODOS_TABLE: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        status BOOLEAN NOT NULL DEFAULT 0
    );
";

/// Applied to every pooled connection when it is opened.
#[derive(Debug)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: DBPool,
}

impl Database {
    /// Builds the connection pool and makes sure the `todos` table exists.
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
        let pool: DBPool = r2d2::Pool::builder()
            .max_size(config.database_pool_size)
            .connection_customizer(Box::new(SqlitePragmas))
            .build(manager)?;

        let database = Database { pool };
        database.create_schema()?;
        tracing::info!(
            database_url = %config.database_url,
            pool_size = config.database_pool_size,
            "database ready"
        );
        Ok(database)
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;
        conn.batch_execute(CREATE_TODOS_TABLE)?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn drop_schema(&self) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;
        conn.batch_execute("DROP TABLE todos;")?;
        Ok(())
    }

    pub fn get_todos(&self) -> Result<Vec<Todo>, StorageError> {
        let mut conn = self.pool.get()?;
        let items = todos
            .order(id.asc())
            .select(Todo::as_select())
            .load(&mut conn)?;
        Ok(items)
    }

    pub fn get_todo_by_id(&self, todo_id: i32) -> Result<Option<Todo>, StorageError> {
        let mut conn = self.pool.get()?;
        let todo = todos
            .find(todo_id)
            .select(Todo::as_select())
            .first(&mut conn)
            .optional()?;
        Ok(todo)
    }

    /// Inserts the todo and returns the id the database assigned to it.
    pub fn create_todo(&self, new_todo: &NewTodo) -> Result<i32, StorageError> {
        let mut conn = self.pool.get()?;
        let todo_id = diesel::insert_into(todos)
            .values(new_todo)
            .returning(id)
            .get_result(&mut conn)?;
        Ok(todo_id)
    }

    /// Applies the changeset with bound parameters. Returns the number of rows
    /// that matched `todo_id` (0 or 1).
    pub fn update_todo_by_id(
        &self,
        todo_id: i32,
        changes: &TodoChangeset,
    ) -> Result<usize, StorageError> {
        let mut conn = self.pool.get()?;
        let count = diesel::update(todos.find(todo_id))
            .set(changes)
            .execute(&mut conn)?;
        Ok(count)
    }

    pub fn delete_todo_by_id(&self, todo_id: i32) -> Result<usize, StorageError> {
        let mut conn = self.pool.get()?;
        let count = diesel::delete(todos.find(todo_id)).execute(&mut conn)?;
        Ok(count)
    }
}
