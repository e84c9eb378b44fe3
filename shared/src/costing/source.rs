//! Data the engine resolves references against

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    Item, Product, ProductItemUsage, ProductRecipeUsage, Recipe, RecipeIngredientLine,
};

/// Lookup of current item and recipe data
///
/// Implementations must answer every call from the same point in time, so a
/// single aggregation never mixes costs from before and after an edit.
pub trait CostSource {
    fn item(&self, id: Uuid) -> Option<&Item>;

    fn recipe(&self, id: Uuid) -> Option<&Recipe>;

    /// Ingredient lines of a recipe; empty when the recipe has none
    fn recipe_lines(&self, recipe_id: Uuid) -> &[RecipeIngredientLine];
}

/// In-memory, point-in-time copy of an organization's costing data
#[derive(Debug, Clone, Default)]
pub struct CostSnapshot {
    items: HashMap<Uuid, Item>,
    recipes: HashMap<Uuid, Recipe>,
    recipe_lines: HashMap<Uuid, Vec<RecipeIngredientLine>>,
    products: HashMap<Uuid, Product>,
    recipe_usages: HashMap<Uuid, Vec<ProductRecipeUsage>>,
    item_usages: HashMap<Uuid, Vec<ProductItemUsage>>,
}

impl CostSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn insert_recipe(&mut self, recipe: Recipe) {
        self.recipes.insert(recipe.id, recipe);
    }

    pub fn insert_recipe_line(&mut self, line: RecipeIngredientLine) {
        self.recipe_lines.entry(line.recipe_id).or_default().push(line);
    }

    pub fn insert_product(&mut self, product: Product) {
        self.products.insert(product.id, product);
    }

    pub fn insert_recipe_usage(&mut self, usage: ProductRecipeUsage) {
        self.recipe_usages
            .entry(usage.product_id)
            .or_default()
            .push(usage);
    }

    pub fn insert_item_usage(&mut self, usage: ProductItemUsage) {
        self.item_usages.entry(usage.product_id).or_default().push(usage);
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.insert_item(item);
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe, lines: Vec<RecipeIngredientLine>) -> Self {
        self.insert_recipe(recipe);
        for line in lines {
            self.insert_recipe_line(line);
        }
        self
    }

    pub fn product(&self, id: Uuid) -> Option<&Product> {
        self.products.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.values()
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.values()
    }

    /// Recipe usages of a product
    pub fn recipe_usages(&self, product_id: Uuid) -> &[ProductRecipeUsage] {
        self.recipe_usages
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Direct item usages of a product
    pub fn item_usages(&self, product_id: Uuid) -> &[ProductItemUsage] {
        self.item_usages
            .get(&product_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl CostSource for CostSnapshot {
    fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.get(&id)
    }

    fn recipe(&self, id: Uuid) -> Option<&Recipe> {
        self.recipes.get(&id)
    }

    fn recipe_lines(&self, recipe_id: Uuid) -> &[RecipeIngredientLine] {
        self.recipe_lines
            .get(&recipe_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
