//! Pancake recipes and the memoizing recipe catalog.
//!
//! A [`Recipe`] is an immutable value object: two recipes are equal iff their
//! ingredient compositions are equal, regardless of how they were built. The
//! [`RecipeBook`] interns recipes by composition and seeds the well-known
//! house pancakes.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The closed set of ingredients a pancake can be made of.
///
/// The declaration order is the canonical rendering order for descriptions:
/// recipes sort their ingredients by this `Ord`, so two recipes with the same
/// composition always render the same string no matter the insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Ingredient {
    MilkChocolate,
    DarkChocolate,
    WhippedCream,
    Flour,
    Egg,
    Milk,
    Hazelnut,
}

impl Ingredient {
    /// Every ingredient, in canonical order.
    pub const ALL: [Ingredient; 7] = [
        Ingredient::MilkChocolate,
        Ingredient::DarkChocolate,
        Ingredient::WhippedCream,
        Ingredient::Flour,
        Ingredient::Egg,
        Ingredient::Milk,
        Ingredient::Hazelnut,
    ];

    /// Human-readable name used in recipe descriptions.
    pub fn name(&self) -> &'static str {
        match self {
            Ingredient::MilkChocolate => "milk chocolate",
            Ingredient::DarkChocolate => "dark chocolate",
            Ingredient::WhippedCream => "whipped cream",
            Ingredient::Flour => "flour",
            Ingredient::Egg => "egg",
            Ingredient::Milk => "milk",
            Ingredient::Hazelnut => "hazelnut",
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable pancake recipe: a mapping from ingredient to quantity.
///
/// Equality and hashing are structural (over the ingredient map), because
/// recipes are used as line-item keys meaning "this exact composition".
/// Cloning is cheap; the composition is shared behind an [`Arc`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipe {
    ingredients: Arc<BTreeMap<Ingredient, u32>>,
}

impl Recipe {
    fn new(ingredients: BTreeMap<Ingredient, u32>) -> Self {
        debug_assert!(!ingredients.is_empty(), "a recipe needs at least one ingredient");
        debug_assert!(ingredients.values().all(|&qty| qty > 0));
        Self {
            ingredients: Arc::new(ingredients),
        }
    }

    /// The recipe's composition, in canonical ingredient order.
    pub fn ingredients(&self) -> &BTreeMap<Ingredient, u32> {
        &self.ingredients
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Delicious pancake with ")?;
        for (i, (ingredient, quantity)) in self.ingredients.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} ({})", ingredient, quantity)?;
        }
        write!(f, "!")
    }
}

/// Name of the dark chocolate whipped cream pancake.
pub const DARK_CHOCOLATE_WHIPPED_CREAM_PANCAKE: &str = "Dark Chocolate Whipped Cream Pancake";
/// Name of the dark chocolate whipped cream hazelnut pancake.
pub const DARK_CHOCOLATE_WHIPPED_CREAM_HAZELNUT_PANCAKE: &str =
    "Dark Chocolate Whipped Cream Hazelnut Pancake";
/// Name of the dark chocolate pancake.
pub const DARK_CHOCOLATE_PANCAKE: &str = "Dark Chocolate Pancake";
/// Name of the milk chocolate hazelnut pancake.
pub const MILK_CHOCOLATE_HAZELNUT_PANCAKE: &str = "Milk Chocolate Hazelnut Pancake";
/// Name of the milk chocolate pancake.
pub const MILK_CHOCOLATE_PANCAKE: &str = "Milk Chocolate Pancake";

/// Memoizing recipe catalog.
///
/// Produces interned, value-equal [`Recipe`] objects from ingredient
/// compositions and by well-known name. Thread-safe; holds no order state.
pub struct RecipeBook {
    interned: Mutex<HashMap<BTreeMap<Ingredient, u32>, Recipe>>,
    named: HashMap<&'static str, Recipe>,
}

impl RecipeBook {
    /// Builds the catalog and seeds the five house pancakes.
    pub fn new() -> Self {
        let book = Self {
            interned: Mutex::new(HashMap::new()),
            named: HashMap::new(),
        };

        let mut named = HashMap::new();
        named.insert(
            DARK_CHOCOLATE_WHIPPED_CREAM_PANCAKE,
            book.recipe(BTreeMap::from([
                (Ingredient::DarkChocolate, 50),
                (Ingredient::WhippedCream, 150),
            ])),
        );
        named.insert(
            DARK_CHOCOLATE_WHIPPED_CREAM_HAZELNUT_PANCAKE,
            book.recipe(BTreeMap::from([
                (Ingredient::Flour, 100),
                (Ingredient::Egg, 1),
                (Ingredient::WhippedCream, 150),
                (Ingredient::Hazelnut, 50),
                (Ingredient::DarkChocolate, 50),
            ])),
        );
        named.insert(
            DARK_CHOCOLATE_PANCAKE,
            book.recipe(BTreeMap::from([
                (Ingredient::Flour, 100),
                (Ingredient::Egg, 1),
                (Ingredient::Milk, 150),
                (Ingredient::DarkChocolate, 50),
            ])),
        );
        named.insert(
            MILK_CHOCOLATE_HAZELNUT_PANCAKE,
            book.recipe(BTreeMap::from([
                (Ingredient::Flour, 100),
                (Ingredient::Egg, 1),
                (Ingredient::Milk, 200),
                (Ingredient::MilkChocolate, 50),
                (Ingredient::Hazelnut, 50),
            ])),
        );
        named.insert(
            MILK_CHOCOLATE_PANCAKE,
            book.recipe(BTreeMap::from([
                (Ingredient::Flour, 100),
                (Ingredient::Egg, 1),
                (Ingredient::Milk, 200),
                (Ingredient::MilkChocolate, 50),
            ])),
        );

        Self { named, ..book }
    }

    /// Returns the interned recipe for a composition, creating it on first use.
    pub fn recipe(&self, ingredients: BTreeMap<Ingredient, u32>) -> Recipe {
        let mut interned = self.interned.lock();
        interned
            .entry(ingredients)
            .or_insert_with_key(|key| Recipe::new(key.clone()))
            .clone()
    }

    /// Looks up a well-known pancake by name.
    pub fn named(&self, name: &str) -> Option<Recipe> {
        self.named.get(name).cloned()
    }

    pub fn dark_chocolate_whipped_cream_pancake(&self) -> Recipe {
        self.named[DARK_CHOCOLATE_WHIPPED_CREAM_PANCAKE].clone()
    }

    pub fn dark_chocolate_whipped_cream_hazelnut_pancake(&self) -> Recipe {
        self.named[DARK_CHOCOLATE_WHIPPED_CREAM_HAZELNUT_PANCAKE].clone()
    }

    pub fn dark_chocolate_pancake(&self) -> Recipe {
        self.named[DARK_CHOCOLATE_PANCAKE].clone()
    }

    pub fn milk_chocolate_hazelnut_pancake(&self) -> Recipe {
        self.named[MILK_CHOCOLATE_HAZELNUT_PANCAKE].clone()
    }

    pub fn milk_chocolate_pancake(&self) -> Recipe {
        self.named[MILK_CHOCOLATE_PANCAKE].clone()
    }

    /// Builds a random six-ingredient pancake on a flour/egg/milk base.
    pub fn random_recipe(&self) -> Recipe {
        let mut rng = rand::rng();
        let mut ingredients = BTreeMap::from([
            (Ingredient::Egg, 2),
            (Ingredient::Flour, 50),
            (Ingredient::Milk, 100),
        ]);
        let quantities = [10, 30, 70];
        let mut next_quantity = 0;
        while ingredients.len() < 6 {
            let pick = Ingredient::ALL[rng.random_range(0..Ingredient::ALL.len())];
            if !ingredients.contains_key(&pick) {
                ingredients.insert(pick, quantities[next_quantity]);
                next_quantity += 1;
            }
        }
        self.recipe(ingredients)
    }
}

impl Default for RecipeBook {
    fn default() -> Self {
        Self::new()
    }
}
