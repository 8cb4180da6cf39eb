use rusqlite::{params, Connection};

/// Per-user recipe lists backed by a `(user_id, recipe_id)` join table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl RecipeCollection {
    fn table(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "carts",
        }
    }

    pub fn already_added_message(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "Рецепт уже добавлен в избранное!",
            RecipeCollection::ShoppingCart => "Рецепт уже добавлен в список покупок!",
        }
    }

    pub fn missing_message(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "Рецепта нет в избранном!",
            RecipeCollection::ShoppingCart => "Рецепта нет в списке покупок!",
        }
    }

    /// Whether `viewer` has the recipe in this collection. Anonymous viewers never do.
    pub fn contains(
        self,
        conn: &Connection,
        viewer: Option<i64>,
        recipe_id: i64,
    ) -> Result<bool, rusqlite::Error> {
        let Some(user_id) = viewer else {
            return Ok(false);
        };
        conn.query_row(
            &format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = ?1 AND recipe_id = ?2)",
                self.table()
            ),
            params![user_id, recipe_id],
            |r| r.get(0),
        )
    }

    /// Returns `false` when the recipe was already there.
    pub fn add(self, conn: &Connection, user_id: i64, recipe_id: i64) -> Result<bool, rusqlite::Error> {
        let inserted = conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} (user_id, recipe_id) VALUES (?1, ?2)",
                self.table()
            ),
            params![user_id, recipe_id],
        )?;
        Ok(inserted > 0)
    }

    /// Returns `false` when there was nothing to remove.
    pub fn remove(
        self,
        conn: &Connection,
        user_id: i64,
        recipe_id: i64,
    ) -> Result<bool, rusqlite::Error> {
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE user_id = ?1 AND recipe_id = ?2",
                self.table()
            ),
            params![user_id, recipe_id],
        )?;
        Ok(deleted > 0)
    }

    /// SQL condition matching recipes (aliased `r`) in the collection of the user bound to `?`.
    pub(crate) fn membership_clause(self) -> String {
        format!(
            "EXISTS (SELECT 1 FROM {} m WHERE m.recipe_id = r.id AND m.user_id = ?)",
            self.table()
        )
    }
}

pub fn is_favorited(
    conn: &Connection,
    viewer: Option<i64>,
    recipe_id: i64,
) -> Result<bool, rusqlite::Error> {
    RecipeCollection::Favorites.contains(conn, viewer, recipe_id)
}

pub fn is_in_shopping_cart(
    conn: &Connection,
    viewer: Option<i64>,
    recipe_id: i64,
) -> Result<bool, rusqlite::Error> {
    RecipeCollection::ShoppingCart.contains(conn, viewer, recipe_id)
}
