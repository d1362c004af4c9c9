use log::debug;

use crate::error::CatalogError;
use crate::model::Recipe;

/// Default number of recipes shown per page
pub const DEFAULT_PAGE_SIZE: usize = 4;

/// Highest valid page index for a view of `len` items.
pub fn max_page_index(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size).saturating_sub(1)
}

/// Pagination and keyword search over a fixed recipe collection.
///
/// The recipe list never changes after construction. A search only replaces
/// the active view, a list of indices into that collection, so resetting is
/// a matter of restoring the identity view.
#[derive(Debug, Clone)]
pub struct CatalogNavigator {
    recipes: Vec<Recipe>,
    active_view: Vec<usize>,
    keyword: Option<String>,
    page_size: usize,
    page_index: usize,
}

impl CatalogNavigator {
    pub fn new(recipes: Vec<Recipe>, page_size: usize) -> Result<Self, CatalogError> {
        if page_size == 0 {
            return Err(CatalogError::InvalidPageSize(page_size));
        }

        let active_view = (0..recipes.len()).collect();
        Ok(Self {
            recipes,
            active_view,
            keyword: None,
            page_size,
            page_index: 0,
        })
    }

    /// Advance one page. Returns `false` when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.page_index += 1;
        true
    }

    /// Go back one page. Returns `false` when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.page_index -= 1;
        true
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to(0)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to(self.max_page_index())
    }

    /// Restrict the view to recipes whose name, description or any
    /// ingredient contains `keyword`, ignoring case. An empty keyword
    /// clears the search. Always returns to the first page.
    pub fn search(&mut self, keyword: &str) {
        if keyword.is_empty() {
            self.reset();
            return;
        }

        let needle = keyword.to_lowercase();
        self.active_view = self
            .recipes
            .iter()
            .enumerate()
            .filter(|(_, recipe)| recipe.matches_lowercase(&needle))
            .map(|(index, _)| index)
            .collect();
        self.keyword = Some(keyword.to_string());
        self.page_index = 0;
        debug!(
            "Search {:?} matched {} of {} recipes",
            keyword,
            self.active_view.len(),
            self.recipes.len()
        );
    }

    /// Drop any search and return to the first page of the full catalog.
    pub fn reset(&mut self) {
        self.active_view = (0..self.recipes.len()).collect();
        self.keyword = None;
        self.page_index = 0;
    }

    /// Recipes on the current page, in catalog order.
    pub fn visible_page(&self) -> Vec<&Recipe> {
        self.visible_indices()
            .iter()
            .map(|&index| &self.recipes[index])
            .collect()
    }

    /// Catalog indices of the recipes on the current page.
    pub fn visible_indices(&self) -> &[usize] {
        let start = (self.page_index * self.page_size).min(self.active_view.len());
        let end = (start + self.page_size).min(self.active_view.len());
        &self.active_view[start..end]
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.max_page_index()
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn max_page_index(&self) -> usize {
        max_page_index(self.active_view.len(), self.page_size)
    }

    /// Number of pages in the active view; zero when nothing matches.
    pub fn page_count(&self) -> usize {
        self.active_view.len().div_ceil(self.page_size)
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 1-based position of the first visible recipe within the active view,
    /// or 0 when the view is empty.
    pub fn first_item_ordinal(&self) -> usize {
        if self.active_view.is_empty() {
            0
        } else {
            self.page_index * self.page_size + 1
        }
    }

    pub fn active_view(&self) -> &[usize] {
        &self.active_view
    }

    pub fn active_len(&self) -> usize {
        self.active_view.len()
    }

    pub fn total_len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_filtered(&self) -> bool {
        self.keyword.is_some()
    }

    /// Keyword of the active search, if any
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn recipe(&self, index: usize) -> Option<&Recipe> {
        self.recipes.get(index)
    }

    /// Mutable access to a recipe, used to resolve its image in place.
    pub fn recipe_mut(&mut self, index: usize) -> Option<&mut Recipe> {
        self.recipes.get_mut(index)
    }

    fn go_to(&mut self, page_index: usize) -> bool {
        let target = page_index.min(self.max_page_index());
        let moved = target != self.page_index;
        self.page_index = target;
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecipe;

    fn recipe(name: &str, description: &str, ingredients: &[&str]) -> Recipe {
        Recipe::from(RawRecipe {
            name: name.to_string(),
            description: description.to_string(),
            image: format!("https://example.com/{}.jpg", name.replace(' ', "-")),
            recipe_yield: "2".to_string(),
            cook_time: "PT10M".to_string(),
            prep_time: "PT5M".to_string(),
            ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        })
    }

    fn numbered(count: usize) -> Vec<Recipe> {
        (0..count)
            .map(|i| recipe(&format!("Recipe {i}"), "", &["salt"]))
            .collect()
    }

    fn names(navigator: &CatalogNavigator) -> Vec<String> {
        navigator
            .visible_page()
            .iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    /// Ten recipes, three of which mention chicken in a different field
    fn mixed_catalog() -> Vec<Recipe> {
        vec![
            recipe("Chicken Curry", "Spicy", &["rice"]),
            recipe("Beef Stew", "Hearty", &["beef", "potato"]),
            recipe("Pancakes", "Fluffy", &["flour", "egg"]),
            recipe("Caesar Salad", "Crisp", &["romaine", "grilled CHICKEN breast"]),
            recipe("Tomato Soup", "Smooth", &["tomato"]),
            recipe("Fish Tacos", "Zesty", &["cod", "tortilla"]),
            recipe("Club Sandwich", "Tastes like chicken", &["bread"]),
            recipe("Lentil Dal", "Earthy", &["lentils"]),
            recipe("Apple Pie", "Sweet", &["apple"]),
            recipe("Veggie Pizza", "Cheesy", &["dough"]),
        ]
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let result = CatalogNavigator::new(numbered(3), 0);
        assert!(matches!(result, Err(CatalogError::InvalidPageSize(0))));
    }

    #[test]
    fn test_ten_recipes_page_size_four() {
        let mut navigator = CatalogNavigator::new(numbered(10), 4).unwrap();
        assert_eq!(navigator.visible_indices(), &[0, 1, 2, 3]);
        assert!(!navigator.has_previous());
        assert!(navigator.has_next());

        assert!(navigator.next_page());
        assert_eq!(navigator.visible_indices(), &[4, 5, 6, 7]);

        assert!(navigator.next_page());
        assert_eq!(navigator.visible_indices(), &[8, 9]);
        assert_eq!(names(&navigator), vec!["Recipe 8", "Recipe 9"]);
        assert!(!navigator.has_next());
        assert!(navigator.has_previous());
        assert_eq!(navigator.first_item_ordinal(), 9);
        assert_eq!(navigator.page_count(), 3);
    }

    #[test]
    fn test_max_page_index_formula() {
        for page_size in 1..=7 {
            for count in 0..=23 {
                let expected = if count == 0 {
                    0
                } else {
                    (count + page_size - 1) / page_size - 1
                };
                assert_eq!(max_page_index(count, page_size), expected);

                let mut navigator = CatalogNavigator::new(numbered(count), page_size).unwrap();
                navigator.last_page();
                assert_eq!(navigator.page_index(), expected);
                assert!(!navigator.next_page());
                assert_eq!(navigator.page_index(), expected);
            }
        }
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut navigator = CatalogNavigator::new(numbered(5), 2).unwrap();
        assert!(!navigator.previous_page());
        assert_eq!(navigator.page_index(), 0);

        assert!(navigator.last_page());
        assert!(!navigator.last_page());
        assert!(!navigator.next_page());
        assert_eq!(navigator.page_index(), 2);
    }

    #[test]
    fn test_first_page_from_anywhere() {
        let mut navigator = CatalogNavigator::new(numbered(12), 3).unwrap();
        navigator.next_page();
        navigator.next_page();
        assert!(navigator.first_page());
        assert_eq!(navigator.page_index(), 0);
        assert!(!navigator.first_page());
        assert_eq!(navigator.page_index(), 0);
    }

    #[test]
    fn test_next_then_previous_round_trip() {
        let mut navigator = CatalogNavigator::new(numbered(20), 3).unwrap();
        navigator.next_page();
        navigator.next_page();
        let before = navigator.page_index();
        assert!(navigator.next_page());
        assert!(navigator.previous_page());
        assert_eq!(navigator.page_index(), before);
    }

    #[test]
    fn test_search_restricts_paging() {
        let mut navigator = CatalogNavigator::new(mixed_catalog(), 2).unwrap();
        navigator.next_page();

        navigator.search("chicken");
        assert_eq!(navigator.active_view(), &[0, 3, 6]);
        assert_eq!(navigator.active_len(), 3);
        assert_eq!(navigator.page_index(), 0);
        assert_eq!(navigator.keyword(), Some("chicken"));
        assert_eq!(names(&navigator), vec!["Chicken Curry", "Caesar Salad"]);

        assert!(navigator.next_page());
        assert_eq!(names(&navigator), vec!["Club Sandwich"]);
        assert!(!navigator.next_page());

        assert!(navigator.previous_page());
        assert!(!navigator.previous_page());
        assert_eq!(names(&navigator), vec!["Chicken Curry", "Caesar Salad"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut navigator = CatalogNavigator::new(mixed_catalog(), 4).unwrap();
        navigator.search("BEEF");
        assert_eq!(navigator.active_view(), &[1]);
        navigator.search("zEsT");
        assert_eq!(navigator.active_view(), &[5]);
    }

    #[test]
    fn test_search_without_matches() {
        let mut navigator = CatalogNavigator::new(mixed_catalog(), 4).unwrap();
        navigator.search("durian");
        assert_eq!(navigator.active_len(), 0);
        assert!(navigator.visible_page().is_empty());
        assert_eq!(navigator.page_index(), 0);
        assert_eq!(navigator.first_item_ordinal(), 0);
        assert_eq!(navigator.page_count(), 0);
        assert!(!navigator.has_next());
        assert!(!navigator.has_previous());
        assert!(!navigator.next_page());
        assert!(!navigator.last_page());
    }

    #[test]
    fn test_empty_search_equals_reset() {
        let mut searched = CatalogNavigator::new(mixed_catalog(), 3).unwrap();
        searched.search("chicken");
        searched.search("");

        let mut reset = CatalogNavigator::new(mixed_catalog(), 3).unwrap();
        reset.search("chicken");
        reset.reset();

        assert_eq!(searched.active_view(), reset.active_view());
        assert_eq!(searched.page_index(), reset.page_index());
        assert!(!searched.is_filtered());
        assert_eq!(searched.active_len(), 10);
    }

    #[test]
    fn test_reset_restores_full_catalog() {
        let mut navigator = CatalogNavigator::new(mixed_catalog(), 3).unwrap();
        navigator.search("chicken");
        navigator.search("soup");
        navigator.search("nothing at all");
        navigator.reset();

        assert!(!navigator.is_filtered());
        assert_eq!(navigator.page_index(), 0);
        assert_eq!(navigator.active_view(), (0..10).collect::<Vec<_>>().as_slice());
        assert_eq!(navigator.recipe(4).map(Recipe::name), Some("Tomato Soup"));
    }

    #[test]
    fn test_empty_catalog() {
        let mut navigator = CatalogNavigator::new(Vec::new(), 4).unwrap();
        assert!(navigator.visible_page().is_empty());
        assert_eq!(navigator.max_page_index(), 0);
        assert!(!navigator.next_page());
        assert!(!navigator.previous_page());
        assert!(!navigator.last_page());
    }
}
