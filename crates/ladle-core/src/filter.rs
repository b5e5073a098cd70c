// ── Collection filtering ──
//
// Pure view derivation: no state, input order preserved.

use std::collections::HashSet;

use ladle_api::Recipe;

/// Derive the visible slice of `recipes`.
///
/// A non-empty (trimmed) query keeps recipes with at least one
/// ingredient whose name contains it case-insensitively; the favorites
/// flag then keeps recipes whose id is in `favorites`. Recipes without
/// an id never count as favorites.
pub fn filter_recipes(
    recipes: &[Recipe],
    query: &str,
    favorites_only: bool,
    favorites: &HashSet<i64>,
) -> Vec<Recipe> {
    let query = query.trim().to_lowercase();

    recipes
        .iter()
        .filter(|recipe| {
            query.is_empty()
                || recipe
                    .ingredients
                    .iter()
                    .any(|ingredient| ingredient.name.to_lowercase().contains(&query))
        })
        .filter(|recipe| !favorites_only || recipe.id.is_some_and(|id| favorites.contains(&id)))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ladle_api::Ingredient;
    use pretty_assertions::assert_eq;

    use super::*;

    fn recipe(id: Option<i64>, title: &str, ingredient_names: &[&str]) -> Recipe {
        Recipe {
            id,
            title: title.into(),
            instructions: String::new(),
            ingredients: ingredient_names
                .iter()
                .map(|name| Ingredient {
                    name: (*name).into(),
                    quantity: None,
                    unit: None,
                })
                .collect(),
            updated_at: None,
        }
    }

    #[test]
    fn matches_ingredient_names_case_insensitively() {
        let recipes = vec![
            recipe(Some(1), "Omelette", &["Egg"]),
            recipe(Some(2), "Porridge", &["Milk"]),
        ];

        let visible = filter_recipes(&recipes, "eg", false, &HashSet::new());

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Omelette");
    }

    #[test]
    fn blank_query_keeps_everything() {
        let recipes = vec![
            recipe(Some(1), "Omelette", &["Egg"]),
            recipe(Some(2), "Porridge", &["Milk"]),
        ];

        assert_eq!(filter_recipes(&recipes, "", false, &HashSet::new()).len(), 2);
        assert_eq!(
            filter_recipes(&recipes, "   ", false, &HashSet::new()).len(),
            2
        );
    }

    #[test]
    fn favorites_only_respects_ids() {
        let recipes = vec![
            recipe(Some(1), "Omelette", &["Egg"]),
            recipe(Some(2), "Porridge", &["Milk"]),
            recipe(None, "Draft", &["Egg"]),
        ];
        let favorites: HashSet<i64> = [2].into_iter().collect();

        let visible = filter_recipes(&recipes, "", true, &favorites);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Porridge");
    }

    #[test]
    fn query_and_favorites_compose() {
        let recipes = vec![
            recipe(Some(1), "Omelette", &["Egg"]),
            recipe(Some(2), "Shakshuka", &["Egg", "Tomato"]),
        ];
        let favorites: HashSet<i64> = [2].into_iter().collect();

        let visible = filter_recipes(&recipes, "egg", true, &favorites);

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Shakshuka");
    }

    #[test]
    fn input_order_is_preserved() {
        let recipes = vec![
            recipe(Some(3), "Shakshuka", &["Egg", "Tomato"]),
            recipe(Some(1), "Omelette", &["Egg"]),
            recipe(Some(2), "Porridge", &["Milk"]),
        ];

        let visible = filter_recipes(&recipes, "egg", false, &HashSet::new());

        let titles: Vec<&str> = visible.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Shakshuka", "Omelette"]);
    }
}
