//! Recipe costing definitions.

use common::Money;
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLInputObject, GraphQLScalar};
use rust_decimal::Decimal;
use service::{domain, query};

use crate::{api::scalar, Context};

/// Quantity of an `Ingredient` used by a recipe.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RecipeQuantity", with = scalar::Via::<Decimal>)]
pub struct Quantity(Decimal);

/// Markup applied on top of a recipe raw cost, in percents.
///
/// May exceed `100`, but can't be negative.
#[derive(AsRef, Clone, Copy, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(name = "RecipeMargin", with = scalar::Via::<Decimal>)]
pub struct Margin(Decimal);

/// Single ingredient of a recipe.
#[derive(Clone, Copy, Debug, GraphQLInputObject)]
#[graphql(name = "RecipeIngredient")]
pub struct Ingredient {
    /// Quantity of this `Ingredient` used by the recipe.
    pub quantity: Quantity,

    /// Price of a single unit of this `Ingredient`.
    pub price_per_unit: Money,
}

impl From<Ingredient> for domain::recipe::Ingredient {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            quantity: ingredient.quantity.into(),
            price_per_unit: ingredient.price_per_unit,
        }
    }
}

/// Calculated cost of a recipe.
#[derive(Clone, Copy, Debug, From)]
pub struct Cost(query::recipe::Output);

/// Calculated cost of a recipe.
#[graphql_object(name = "RecipeCost", context = Context)]
impl Cost {
    /// Rounded sum of all the `Ingredient` costs.
    #[must_use]
    pub fn raw_cost(&self) -> Money {
        self.0.raw_cost
    }

    /// Rounded raw cost with the margin applied.
    #[must_use]
    pub fn final_price(&self) -> Money {
        self.0.final_price
    }
}
